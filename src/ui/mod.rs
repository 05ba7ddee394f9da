mod common;
mod dashboard;
mod text_field;
mod variable_form;

// Public API
pub use dashboard::display_dashboard;
pub use variable_form::{FormPrompt, VariableForm};
