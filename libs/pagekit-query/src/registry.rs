//! Ordered `(drivers, pattern, converter)` registrations.
//!
//! Resolution is a linear scan in insertion order: built-ins first, then
//! caller registrations. The first entry whose driver set contains the active
//! driver, whose pattern matches and whose converter accepts the value wins.
//!
//! The converter receives the operand captured by the pattern's first group,
//! or the whole raw value when the pattern has no group.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::{
    Driver, FieldKind, FilterError, FilterExpressionConverter, FilterResult, LikeConverter,
    NotLikeConverter, Predicate, RangeConverter,
};

#[derive(Clone)]
pub struct ConverterRegistration {
    drivers: Vec<Driver>,
    pattern: Regex,
    converter: Arc<dyn FilterExpressionConverter>,
}

impl ConverterRegistration {
    /// # Errors
    /// Returns `FilterError::InvalidPattern` if `pattern` is not a valid regex and
    /// `FilterError::NoDriver` if `drivers` is empty.
    pub fn new(
        drivers: &[Driver],
        pattern: &str,
        converter: Arc<dyn FilterExpressionConverter>,
    ) -> FilterResult<Self> {
        if drivers.is_empty() {
            return Err(FilterError::NoDriver {
                pattern: pattern.to_owned(),
            });
        }
        let pattern = Regex::new(pattern).map_err(|e| FilterError::InvalidPattern {
            pattern: pattern.to_owned(),
            reason: e.to_string(),
        })?;

        let mut unique = Vec::with_capacity(drivers.len());
        for d in drivers {
            if !unique.contains(d) {
                unique.push(*d);
            }
        }

        Ok(Self {
            drivers: unique,
            pattern,
            converter,
        })
    }

    #[must_use]
    pub fn drivers(&self) -> &[Driver] {
        &self.drivers
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    #[must_use]
    pub fn converter(&self) -> &dyn FilterExpressionConverter {
        self.converter.as_ref()
    }

    /// Whether the pattern has a group capturing the converter's operand.
    #[must_use]
    pub fn captures_operand(&self) -> bool {
        self.pattern.captures_len() > 1
    }

    fn resolve<'v>(&self, driver: Driver, raw: &'v str) -> Option<Resolved<'_, 'v>> {
        if !self.drivers.contains(&driver) {
            return None;
        }
        let caps = self.pattern.captures(raw)?;
        let operand = caps.get(1).map_or(raw, |m| m.as_str());
        self.converter
            .supports(driver, operand)
            .then_some(Resolved {
                converter: self.converter.as_ref(),
                operand,
            })
    }
}

/// A converter picked for one raw value, with the operand it converts.
#[derive(Clone, Copy, Debug)]
pub struct Resolved<'r, 'v> {
    converter: &'r dyn FilterExpressionConverter,
    operand: &'v str,
}

impl Resolved<'_, '_> {
    #[must_use]
    pub fn converter(&self) -> &dyn FilterExpressionConverter {
        self.converter
    }

    #[must_use]
    pub fn operand(&self) -> &str {
        self.operand
    }

    /// # Errors
    /// Whatever the converter returns for this operand.
    pub fn convert(&self, field: &str, kind: FieldKind) -> FilterResult<Predicate> {
        self.converter.convert(field, self.operand, kind)
    }
}

impl fmt::Debug for ConverterRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterRegistration")
            .field("drivers", &self.drivers)
            .field("pattern", &self.pattern.as_str())
            .field("converter", &self.converter.name())
            .finish()
    }
}

#[derive(Clone, Debug, Default)]
#[must_use]
pub struct ConverterRegistry {
    registrations: Vec<ConverterRegistration>,
}

impl ConverterRegistry {
    /// Registry without any converter: every value is an equality operand.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry holding the built-in converters, in resolution order:
    /// `like`, `notlike`, `range`, each enabled for every driver.
    ///
    /// # Panics
    /// Panics only if a built-in pattern fails to compile.
    pub fn with_builtins() -> Self {
        let builtins: [(&str, Arc<dyn FilterExpressionConverter>); 3] = [
            (LikeConverter::PATTERN, Arc::new(LikeConverter)),
            (NotLikeConverter::PATTERN, Arc::new(NotLikeConverter)),
            (RangeConverter::PATTERN, Arc::new(RangeConverter)),
        ];

        let mut registry = Self::empty();
        for (pattern, converter) in builtins {
            #[allow(clippy::expect_used)]
            let registration = ConverterRegistration::new(Driver::ALL, pattern, converter)
                .expect("built-in converter pattern must compile");
            registry.registrations.push(registration);
        }
        registry
    }

    /// Look up a built-in converter by its name.
    #[must_use]
    pub fn builtin(name: &str) -> Option<Arc<dyn FilterExpressionConverter>> {
        match name {
            LikeConverter::NAME => Some(Arc::new(LikeConverter)),
            NotLikeConverter::NAME => Some(Arc::new(NotLikeConverter)),
            RangeConverter::NAME => Some(Arc::new(RangeConverter)),
            _ => None,
        }
    }

    /// Append a registration; it is tried after every existing one.
    pub fn register(mut self, registration: ConverterRegistration) -> Self {
        self.push(registration);
        self
    }

    pub fn push(&mut self, registration: ConverterRegistration) {
        tracing::debug!(
            pattern = registration.pattern(),
            converter = registration.converter.name(),
            "registering filter expression converter"
        );
        self.registrations.push(registration);
    }

    #[must_use]
    pub fn registrations(&self) -> &[ConverterRegistration] {
        &self.registrations
    }

    /// First converter registered for `driver` that recognizes `raw`.
    ///
    /// `None` means `raw` is a literal equality operand.
    #[must_use]
    pub fn resolve<'v>(&self, driver: Driver, raw: &'v str) -> Option<Resolved<'_, 'v>> {
        self.registrations.iter().find_map(|r| r.resolve(driver, raw))
    }
}
