//! Option descriptors: parameter type tags, extracted values, and the
//! per-option record the registry stores.
//!
//! An [`OptionSpec`] binds a unique name to an ordered list of typed
//! parameter slots ([`Arity`]), a description, and dependency constraints.
//! The callback itself is held by the parser, not the spec, so a spec stays
//! plain data: one shape covers every arity instead of one record per
//! callback signature.

use std::collections::BTreeSet;

/// Maximum number of fixed parameter slots an option may declare.
pub const MAX_FIXED_ARITY: usize = 5;

/// Scalar parameter kind accepted by an option.
///
/// Each kind selects one extraction routine and carries a fixed usage label
/// used in error messages and help text.
///
/// # Examples
///
/// ```
/// use optline_core::ParamType;
///
/// assert_eq!(ParamType::I32.usage_label(), "<i32>");
/// assert_eq!(ParamType::Str.usage_label(), "<string>");
/// assert!(ParamType::U16.is_unsigned());
/// assert!(!ParamType::F64.is_unsigned());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    /// Signed 8-bit integer.
    I8,
    /// Signed 16-bit integer.
    I16,
    /// Signed 32-bit integer.
    I32,
    /// Signed 64-bit integer.
    I64,
    /// Unsigned 8-bit integer.
    U8,
    /// Unsigned 16-bit integer.
    U16,
    /// Unsigned 32-bit integer.
    U32,
    /// Unsigned 64-bit integer.
    U64,
    /// 32-bit floating point.
    F32,
    /// 64-bit floating point.
    F64,
    /// Exactly one character.
    Char,
    /// One whitespace/quote-delimited token, verbatim.
    Str,
}

impl ParamType {
    /// Returns the fixed usage label shown in help text and errors.
    pub fn usage_label(&self) -> &'static str {
        match self {
            ParamType::I8 => "<i8>",
            ParamType::I16 => "<i16>",
            ParamType::I32 => "<i32>",
            ParamType::I64 => "<i64>",
            ParamType::U8 => "<u8>",
            ParamType::U16 => "<u16>",
            ParamType::U32 => "<u32>",
            ParamType::U64 => "<u64>",
            ParamType::F32 => "<f32>",
            ParamType::F64 => "<f64>",
            ParamType::Char => "<char>",
            ParamType::Str => "<string>",
        }
    }

    /// Returns `true` for kinds that reject a leading `-` outright.
    pub fn is_unsigned(&self) -> bool {
        matches!(
            self,
            ParamType::U8 | ParamType::U16 | ParamType::U32 | ParamType::U64
        )
    }
}

/// A parameter value extracted from the token stream.
///
/// Variants mirror [`ParamType`]; the accessor methods widen within a
/// family so callbacks rarely need to match on the exact variant.
///
/// # Examples
///
/// ```
/// use optline_core::ParamValue;
///
/// let value = ParamValue::I16(-42);
/// assert_eq!(value.as_i64(), Some(-42));
/// assert_eq!(value.as_u64(), None);
///
/// let name = ParamValue::Str("ada".to_string());
/// assert_eq!(name.as_str(), Some("ada"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Char(char),
    Str(String),
}

impl ParamValue {
    /// Returns the kind this value was extracted as.
    pub fn kind(&self) -> ParamType {
        match self {
            ParamValue::I8(_) => ParamType::I8,
            ParamValue::I16(_) => ParamType::I16,
            ParamValue::I32(_) => ParamType::I32,
            ParamValue::I64(_) => ParamType::I64,
            ParamValue::U8(_) => ParamType::U8,
            ParamValue::U16(_) => ParamType::U16,
            ParamValue::U32(_) => ParamType::U32,
            ParamValue::U64(_) => ParamType::U64,
            ParamValue::F32(_) => ParamType::F32,
            ParamValue::F64(_) => ParamType::F64,
            ParamValue::Char(_) => ParamType::Char,
            ParamValue::Str(_) => ParamType::Str,
        }
    }

    /// Widens any signed integer variant to `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            ParamValue::I8(v) => Some(v.into()),
            ParamValue::I16(v) => Some(v.into()),
            ParamValue::I32(v) => Some(v.into()),
            ParamValue::I64(v) => Some(v),
            _ => None,
        }
    }

    /// Widens any unsigned integer variant to `u64`.
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            ParamValue::U8(v) => Some(v.into()),
            ParamValue::U16(v) => Some(v.into()),
            ParamValue::U32(v) => Some(v.into()),
            ParamValue::U64(v) => Some(v),
            _ => None,
        }
    }

    /// Widens either float variant to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            ParamValue::F32(v) => Some(v.into()),
            ParamValue::F64(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the character for a `Char` value.
    pub fn as_char(&self) -> Option<char> {
        match *self {
            ParamValue::Char(c) => Some(c),
            _ => None,
        }
    }

    /// Returns the string slice for a `Str` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Parameter arity of an option: a fixed slot list or a variadic tail.
///
/// Fixed arity is limited to [`MAX_FIXED_ARITY`] slots, checked at
/// registration. A variadic option consumes tokens of one element kind
/// until the next token names a registered option or the stream ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arity {
    /// Zero or more typed slots, extracted left to right.
    Fixed(Vec<ParamType>),
    /// Any number of values of one kind.
    Variadic(ParamType),
}

impl Arity {
    /// Number of declared fixed slots (`0` for variadic).
    pub fn slot_count(&self) -> usize {
        match self {
            Arity::Fixed(kinds) => kinds.len(),
            Arity::Variadic(_) => 0,
        }
    }

    /// Returns `true` for a variadic tail.
    pub fn is_variadic(&self) -> bool {
        matches!(self, Arity::Variadic(_))
    }
}

/// Descriptor for one registered option.
///
/// Identity is the name; the empty name designates the *default* option,
/// which matches the raw stream without a keyword and may not coexist with
/// any named option. Dependency sets (`requires`/`conflicts`) are added
/// through the owning [`Parser`](crate::Parser) so referenced names are
/// checked against the registry when declared.
///
/// # Examples
///
/// ```
/// use optline_core::{OptionSpec, ParamType};
///
/// let spec = OptionSpec::new("connect")
///     .with_description("Open a connection")
///     .with_params(&[ParamType::Str, ParamType::U16]);
///
/// assert_eq!(spec.name(), "connect");
/// assert_eq!(spec.usage(), "connect <string> <u16>");
/// assert!(!spec.is_default());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    name: String,
    description: String,
    arity: Arity,
    required: bool,
    exclusive: bool,
    requires: BTreeSet<String>,
    conflicts: BTreeSet<String>,
}

impl OptionSpec {
    /// Creates a zero-parameter option with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            arity: Arity::Fixed(Vec::new()),
            required: false,
            exclusive: false,
            requires: BTreeSet::new(),
            conflicts: BTreeSet::new(),
        }
    }

    /// Creates the default (empty-name) option.
    ///
    /// The default option is extracted straight from the argument stream
    /// without a matching keyword; a registry holding it accepts no other
    /// option.
    pub fn default_option() -> Self {
        Self::new("")
    }

    /// Adds a human description shown in help text.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Appends one fixed parameter slot.
    pub fn with_param(mut self, kind: ParamType) -> Self {
        match &mut self.arity {
            Arity::Fixed(kinds) => kinds.push(kind),
            Arity::Variadic(_) => self.arity = Arity::Fixed(vec![kind]),
        }
        self
    }

    /// Replaces the slot list with the given fixed parameters.
    pub fn with_params(mut self, kinds: &[ParamType]) -> Self {
        self.arity = Arity::Fixed(kinds.to_vec());
        self
    }

    /// Makes the option variadic over one element kind.
    pub fn variadic(mut self, kind: ParamType) -> Self {
        self.arity = Arity::Variadic(kind);
        self
    }

    /// Marks the option as mandatory for every run.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Marks the option as standalone: it must not co-occur with any other
    /// queued option.
    pub fn exclusive(mut self) -> Self {
        self.exclusive = true;
        self
    }

    /// Option name (empty for the default option).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human description (may be empty).
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Declared parameter arity.
    pub fn arity(&self) -> &Arity {
        &self.arity
    }

    /// Whether every run must include this option.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Whether this option refuses all co-occurrence.
    pub fn is_exclusive(&self) -> bool {
        self.exclusive
    }

    /// Whether this is the default (empty-name) option.
    pub fn is_default(&self) -> bool {
        self.name.is_empty()
    }

    /// Names this option requires alongside itself.
    pub fn requires(&self) -> &BTreeSet<String> {
        &self.requires
    }

    /// Names this option must not co-occur with.
    pub fn conflicts(&self) -> &BTreeSet<String> {
        &self.conflicts
    }

    /// Builds the usage line: the name followed by each slot's usage label.
    ///
    /// # Examples
    ///
    /// ```
    /// use optline_core::{OptionSpec, ParamType};
    ///
    /// let fixed = OptionSpec::new("repeat").with_params(&[ParamType::Str, ParamType::U32]);
    /// assert_eq!(fixed.usage(), "repeat <string> <u32>");
    ///
    /// let tail = OptionSpec::new("sum").variadic(ParamType::I64);
    /// assert_eq!(tail.usage(), "sum <i64>...");
    /// ```
    pub fn usage(&self) -> String {
        let mut out = self.name.clone();
        match &self.arity {
            Arity::Fixed(kinds) => {
                for kind in kinds {
                    if !out.is_empty() {
                        out.push(' ');
                    }
                    out.push_str(kind.usage_label());
                }
            }
            Arity::Variadic(kind) => {
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(kind.usage_label());
                out.push_str("...");
            }
        }
        out
    }

    pub(crate) fn add_requires<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        self.requires.extend(names.into_iter().map(String::from));
    }

    pub(crate) fn add_conflicts<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        self.conflicts.extend(names.into_iter().map(String::from));
    }

    pub(crate) fn set_exclusive(&mut self) {
        self.exclusive = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_concatenates_labels() {
        let spec = OptionSpec::new("mix").with_params(&[
            ParamType::I8,
            ParamType::F64,
            ParamType::Char,
            ParamType::Str,
        ]);
        assert_eq!(spec.usage(), "mix <i8> <f64> <char> <string>");
    }

    #[test]
    fn test_default_option_usage_has_no_name() {
        let spec = OptionSpec::default_option().with_params(&[ParamType::Str]);
        assert!(spec.is_default());
        assert_eq!(spec.usage(), "<string>");
    }

    #[test]
    fn test_value_accessors_reject_other_families() {
        assert_eq!(ParamValue::U8(7).as_u64(), Some(7));
        assert_eq!(ParamValue::U8(7).as_i64(), None);
        assert_eq!(ParamValue::F32(1.5).as_f64(), Some(1.5));
        assert_eq!(ParamValue::Char('x').as_str(), None);
    }

    #[test]
    fn test_with_param_appends_slots() {
        let spec = OptionSpec::new("pair")
            .with_param(ParamType::I32)
            .with_param(ParamType::I32);
        assert_eq!(spec.arity().slot_count(), 2);
        assert!(!spec.arity().is_variadic());
    }
}
