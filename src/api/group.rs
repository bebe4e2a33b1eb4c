/// A named set of argument ids with joint required/exclusive semantics.
///
/// Unless [`ArgGroup::multiple`] is enabled, the members of a group are
/// mutually exclusive.
///
/// ### Example
/// ```
/// use clargs::{Arg, ArgGroup, Command, ErrorKind};
///
/// let command = Command::new("tool")
///     .arg(Arg::new("json").long("json"))
///     .arg(Arg::new("yaml").long("yaml"))
///     .group(ArgGroup::new("format").arg("json").arg("yaml"));
///
/// let error = command
///     .get_matches(["--json", "a", "--yaml", "b"])
///     .unwrap_err();
/// assert_eq!(error.kind(), ErrorKind::ArgumentConflict);
/// ```
#[derive(Debug, Clone)]
pub struct ArgGroup {
    pub(crate) id: String,
    pub(crate) args: Vec<String>,
    pub(crate) required: bool,
    pub(crate) multiple: bool,
    pub(crate) conflicts_with: Vec<String>,
    pub(crate) requires: Vec<String>,
}

impl ArgGroup {
    /// Create a group keyed by `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            args: Vec::default(),
            required: false,
            multiple: false,
            conflicts_with: Vec::default(),
            requires: Vec::default(),
        }
    }

    /// The group's id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Add a member argument by id.
    pub fn arg(mut self, id: impl Into<String>) -> Self {
        self.args.push(id.into());
        self
    }

    /// Add several member arguments by id.
    pub fn args(mut self, ids: Vec<impl Into<String>>) -> Self {
        self.args.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Require at least one member of this group to be present.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Allow several members of this group to appear together.
    pub fn multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    /// Declare that no member of this group may appear together with `other`.
    pub fn conflicts_with(mut self, other: impl Into<String>) -> Self {
        self.conflicts_with.push(other.into());
        self
    }

    /// Declare that any present member of this group needs `other`.
    pub fn requires(mut self, other: impl Into<String>) -> Self {
        self.requires.push(other.into());
        self
    }
}
