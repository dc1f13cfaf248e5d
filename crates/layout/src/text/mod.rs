pub mod tokens;
pub mod wrapper;

pub use tokens::{Cursor, Role, Token, TokenKind, TokenStream};
pub use wrapper::{FittedLine, ItemKind, LineBreaker, LineItem};
