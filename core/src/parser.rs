//! Option registry and two-phase run loop.
//!
//! A [`Parser`] owns every registered option (descriptor plus boxed
//! callback) in append order. One [`run`](Parser::run) call works in two
//! phases: the parse phase tokenizes the arguments, matches each token
//! against a registered name and extracts that option's typed parameters
//! into a queue; the validate-then-execute phase checks the whole queue's
//! dependency constraints and, only if every constraint holds, dispatches
//! the callbacks in discovery order.
//!
//! Run-time failures abort the current run and leave the parser reusable;
//! nothing queued before a failure is ever executed.

use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, trace};

use crate::extract::{ExtractError, extract};
use crate::help;
use crate::option::{Arity, MAX_FIXED_ARITY, OptionSpec, ParamValue};
use crate::token::TokenStream;
use crate::validate::{DependencyError, validate_queue};

/// Reserved tokens that display help and suppress execution for the run.
pub const HELP_TOKENS: &[&str] = &["?", "help"];

/// Registration-time failure.
///
/// Fatal to the registration call that produced it; the registry is left
/// unchanged and the caller may continue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The name is already registered.
    #[error("duplicate option name: '{0}'")]
    DuplicateOption(String),
    /// A default option may not coexist with named options.
    #[error("the default option must be the only registered option")]
    DefaultNotAlone,
    /// More fixed parameter slots than the parser supports.
    #[error("option '{option}' declares {count} parameters (maximum {max})", max = MAX_FIXED_ARITY)]
    TooManyParams { option: String, count: usize },
    /// A dependency declaration named an unregistered owner.
    #[error("unknown option: '{0}'")]
    UnknownOption(String),
    /// A dependency declaration referenced an unregistered option.
    #[error("option '{owner}' references unknown option '{name}'")]
    UnknownDependency { owner: String, name: String },
    /// An option may not appear in its own dependency sets.
    #[error("option '{0}' cannot depend on itself")]
    SelfDependency(String),
}

/// Failure of a single [`run`](Parser::run) call.
///
/// Every variant names the offending option or token. The parser itself
/// stays usable for further runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    /// A non-empty token matched no registered option name.
    #[error("unknown option: '{0}'")]
    UnknownOption(String),
    /// Parameter extraction failed for a matched option.
    #[error("option '{option}': {source}")]
    Extraction {
        option: String,
        #[source]
        source: ExtractError,
    },
    /// The queue violated dependency constraints; nothing was executed.
    #[error("dependency check failed: {}", format_violations(.0))]
    Dependency(Vec<DependencyError>),
}

fn format_violations(errors: &[DependencyError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Outcome of a successful [`run`](Parser::run).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Names of the options executed, in discovery order.
    pub executed: Vec<String>,
    /// `true` when a help token short-circuited the run.
    pub help_shown: bool,
}

struct RegisteredOption {
    spec: OptionSpec,
    callback: Box<dyn FnMut(&[ParamValue])>,
}

/// Keyword-dispatch option parser: registry, extraction driver, and
/// dispatcher in one owning value.
///
/// # Examples
///
/// ```
/// use optline_core::{OptionSpec, ParamType, Parser};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let log = Rc::new(RefCell::new(Vec::new()));
/// let sink = Rc::clone(&log);
///
/// let mut parser = Parser::new("demo", "1.0.0", "scaling demo");
/// parser
///     .add_option(
///         OptionSpec::new("scale")
///             .with_description("Scale a value")
///             .with_params(&[ParamType::F64]),
///         move |values| sink.borrow_mut().push(values[0].as_f64().unwrap()),
///     )
///     .unwrap();
///
/// let report = parser.run(["scale", "2.5", "scale", "-1.0"]).unwrap();
/// assert_eq!(report.executed, ["scale", "scale"]);
/// assert_eq!(*log.borrow(), vec![2.5, -1.0]);
/// ```
pub struct Parser {
    name: String,
    version: String,
    description: String,
    options: Vec<RegisteredOption>,
    index: HashMap<String, usize>,
}

impl Parser {
    /// Creates an empty parser with program metadata for help output.
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: description.into(),
            options: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Program name shown in help output.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Program version shown in help output.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Program description shown in help output.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Number of registered options.
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    /// Returns `true` if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Registered option descriptors in registration order.
    pub fn options(&self) -> impl Iterator<Item = &OptionSpec> {
        self.options.iter().map(|entry| &entry.spec)
    }

    /// Looks up one registered descriptor by name.
    pub fn option(&self, name: &str) -> Option<&OptionSpec> {
        self.index.get(name).map(|&idx| &self.options[idx].spec)
    }

    /// Registers an option and its callback.
    ///
    /// Fails on a duplicate name, on more than [`MAX_FIXED_ARITY`] fixed
    /// slots, and on any attempt to mix the default (empty-name) option
    /// with named options. A failed call leaves the registry untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use optline_core::{OptionSpec, Parser, RegistryError};
    ///
    /// let mut parser = Parser::new("demo", "1.0.0", "");
    /// parser.add_option(OptionSpec::new("once"), |_| {}).unwrap();
    ///
    /// let again = parser.add_option(OptionSpec::new("once"), |_| {});
    /// assert_eq!(again, Err(RegistryError::DuplicateOption("once".to_string())));
    /// assert_eq!(parser.option_count(), 1);
    /// ```
    pub fn add_option<F>(&mut self, spec: OptionSpec, callback: F) -> Result<(), RegistryError>
    where
        F: FnMut(&[ParamValue]) + 'static,
    {
        if let Arity::Fixed(kinds) = spec.arity() {
            if kinds.len() > MAX_FIXED_ARITY {
                return Err(RegistryError::TooManyParams {
                    option: spec.name().to_string(),
                    count: kinds.len(),
                });
            }
        }
        if self.index.contains_key(spec.name()) {
            return Err(RegistryError::DuplicateOption(spec.name().to_string()));
        }
        if self.has_default() || (spec.is_default() && !self.options.is_empty()) {
            return Err(RegistryError::DefaultNotAlone);
        }

        debug!(option = spec.name(), arity = spec.arity().slot_count(), "registered option");
        self.index.insert(spec.name().to_string(), self.options.len());
        self.options.push(RegisteredOption {
            spec,
            callback: Box::new(callback),
        });
        Ok(())
    }

    /// Declares that `owner` requires every option in `names` to co-occur.
    ///
    /// All names are checked against the registry now, not at run time.
    pub fn add_requirement(&mut self, owner: &str, names: &[&str]) -> Result<(), RegistryError> {
        self.check_dependency_names(owner, names)?;
        let idx = self.index[owner];
        self.options[idx].spec.add_requires(names.iter().copied());
        Ok(())
    }

    /// Declares that `owner` must not co-occur with any option in `names`.
    ///
    /// All names are checked against the registry now, not at run time.
    pub fn add_conflict(&mut self, owner: &str, names: &[&str]) -> Result<(), RegistryError> {
        self.check_dependency_names(owner, names)?;
        let idx = self.index[owner];
        self.options[idx].spec.add_conflicts(names.iter().copied());
        Ok(())
    }

    /// Marks `owner` as standalone: any other queued option is a violation.
    pub fn make_exclusive(&mut self, owner: &str) -> Result<(), RegistryError> {
        let Some(&idx) = self.index.get(owner) else {
            return Err(RegistryError::UnknownOption(owner.to_string()));
        };
        self.options[idx].spec.set_exclusive();
        Ok(())
    }

    /// Renders the help text: program banner plus every option's
    /// description and usage line.
    pub fn render_help(&self) -> String {
        help::render_help(self)
    }

    /// Builds the serializable description of this registry.
    pub fn summary(&self) -> help::ParserSummary {
        help::ParserSummary::from_parser(self)
    }

    /// Parses, validates, and dispatches one argument list.
    ///
    /// See the [module docs](self) for the two-phase contract. `args` is
    /// typically `std::env::args().skip(1)`.
    pub fn run<I, S>(&mut self, args: I) -> Result<RunReport, RunError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut stream = TokenStream::from_args(args);
        self.run_stream(&mut stream)
    }

    /// Like [`run`](Self::run), over a raw command line.
    pub fn run_line(&mut self, line: &str) -> Result<RunReport, RunError> {
        let mut stream = TokenStream::from_line(line);
        self.run_stream(&mut stream)
    }

    fn run_stream(&mut self, stream: &mut TokenStream) -> Result<RunReport, RunError> {
        let queue = match self.parse_phase(stream)? {
            Some(queue) => queue,
            None => {
                // help token: empty queue, nothing validates or executes
                print!("{}", self.render_help());
                return Ok(RunReport {
                    executed: Vec::new(),
                    help_shown: true,
                });
            }
        };

        let queued_specs: Vec<&OptionSpec> =
            queue.iter().map(|(idx, _)| &self.options[*idx].spec).collect();
        let violations = validate_queue(&queued_specs, self.options.iter().map(|o| &o.spec));
        if !violations.is_empty() {
            debug!(
                queued = queue.len(),
                violations = violations.len(),
                "dependency check failed, discarding queue"
            );
            return Err(RunError::Dependency(violations));
        }

        let mut executed = Vec::with_capacity(queue.len());
        for (idx, values) in queue {
            let entry = &mut self.options[idx];
            trace!(option = entry.spec.name(), "dispatching");
            (entry.callback)(&values);
            executed.push(entry.spec.name().to_string());
        }
        Ok(RunReport {
            executed,
            help_shown: false,
        })
    }

    /// Parse phase. `Ok(None)` means a help token was seen.
    fn parse_phase(
        &self,
        stream: &mut TokenStream,
    ) -> Result<Option<Vec<(usize, Vec<ParamValue>)>>, RunError> {
        let mut queue = Vec::new();

        if self.has_default() {
            let mark = stream.position();
            match stream.next_token() {
                None => return Ok(Some(queue)),
                Some(token) if is_help_token(token) => return Ok(None),
                Some(_) => stream.rewind(mark),
            }
            // the default option consumes the stream without a keyword
            let values = self
                .extract_params(0, stream)
                .map_err(|source| RunError::Extraction {
                    option: "(default)".to_string(),
                    source,
                })?;
            queue.push((0, values));
            if let Some(extra) = stream.next_token() {
                return Err(RunError::UnknownOption(extra.to_string()));
            }
            return Ok(Some(queue));
        }

        loop {
            let Some(token) = stream.next_token().map(str::to_owned) else {
                break;
            };
            if is_help_token(&token) {
                return Ok(None);
            }
            let Some(&idx) = self.index.get(token.as_str()) else {
                debug!(token = token.as_str(), "unknown option token");
                return Err(RunError::UnknownOption(token));
            };
            trace!(option = token.as_str(), "matched option");
            let values = self
                .extract_params(idx, stream)
                .map_err(|source| RunError::Extraction {
                    option: token,
                    source,
                })?;
            queue.push((idx, values));
        }

        Ok(Some(queue))
    }

    fn extract_params(
        &self,
        idx: usize,
        stream: &mut TokenStream,
    ) -> Result<Vec<ParamValue>, ExtractError> {
        match self.options[idx].spec.arity() {
            Arity::Fixed(kinds) => {
                let mut values = Vec::with_capacity(kinds.len());
                for kind in kinds {
                    values.push(extract(*kind, stream)?);
                }
                Ok(values)
            }
            Arity::Variadic(kind) => {
                let mut values = Vec::new();
                loop {
                    let mark = stream.position();
                    let stop = match stream.next_token() {
                        None => true,
                        Some(token) => self.index.contains_key(token),
                    };
                    stream.rewind(mark);
                    if stop {
                        break;
                    }
                    values.push(extract(*kind, stream)?);
                }
                Ok(values)
            }
        }
    }

    fn has_default(&self) -> bool {
        self.options
            .first()
            .is_some_and(|entry| entry.spec.is_default())
    }

    fn check_dependency_names(&self, owner: &str, names: &[&str]) -> Result<(), RegistryError> {
        if !self.index.contains_key(owner) {
            return Err(RegistryError::UnknownOption(owner.to_string()));
        }
        for name in names {
            if *name == owner {
                return Err(RegistryError::SelfDependency(owner.to_string()));
            }
            if !self.index.contains_key(*name) {
                return Err(RegistryError::UnknownDependency {
                    owner: owner.to_string(),
                    name: (*name).to_string(),
                });
            }
        }
        Ok(())
    }
}

fn is_help_token(token: &str) -> bool {
    HELP_TOKENS.contains(&token)
}
