pub mod content;
pub mod font;
pub mod ids;

pub use content::{Chapter, ContentUnit, FootnoteRecord, TextRun, TextStyle};
pub use font::{FontSpec, FontStyle, FontWeight};
pub use ids::FootnoteId;
