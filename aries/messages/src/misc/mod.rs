mod mime_type;

pub use mime_type::MimeType;
