pub mod scan;
pub mod shell;
pub mod tokenize;
pub mod types;

pub use scan::Quote;
pub use shell::parse;
pub use tokenize::{is_redirect, tokenize};
pub use types::{Call, Command, Operator, Pipe, Sequence};
