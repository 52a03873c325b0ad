//! The shared safe numeric input pipeline: declarative field specs,
//! sanitization, range validation, and the generic form reducer every
//! calculator is driven through.

mod errors;
mod form;
mod spec;
mod value;

pub use errors::{FieldError, FieldErrors};
pub use form::{Calculator, EvalError, FieldKey, FieldValues, FormEvent, FormPhase, FormState};
pub use spec::{FieldSpec, check_range, clamp, sanitize, validate};
pub use value::NumericField;
