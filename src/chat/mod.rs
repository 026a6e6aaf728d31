// Chat-completion wire layer: protocol types, the Gaia client, and the
// embedded tool-call parser for models that answer in marker-delimited text.
pub mod client;
pub mod parser;
pub mod protocol;
