//! Checks `terraform plan` output against expected-output fixtures.
//!
//! A fixture is literal text with `{name}` placeholders. It is compiled into
//! a regular expression that tolerates any whitespace differences and
//! requires every occurrence of a placeholder to bind the same text.

pub mod template;
pub mod terraform;
pub mod verify;

pub use template::{Template, TemplateMatch, Token, compile, tokenize};
pub use terraform::{PlanRequest, Terraform, is_valid_hyphenated_name, parse_var};
pub use verify::{load_fixture, trim_fixture, verify, verify_template};
