#![deny(unused_must_use)]
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

pub use err::{DeserializationError, Result, SerializationError, SysCharError};
pub use settings::ParserSettings;
pub use syschar_document::{ParseStats, SysCharDocument};
pub use syschar_model::{LockToken, SyscharModel};
pub use sysent::{RecordField, SysEnt};
pub use sysitem::SysItem;
pub use sysitem_parser::{ItemParse, parse_sysitem};
pub use vocabulary::{
    Datatype, Family, ItemTag, MessageLevel, Subtype, SubtypeTable, SysCharStatus,
    SYSCHAR_NAMESPACE,
};

pub mod err;
pub mod json_output;
pub mod model;
pub mod settings;
pub mod syschar_document;
pub mod syschar_model;
pub mod sysent;
pub mod sysitem;
mod sysitem_output;
pub mod sysitem_parser;
pub mod vocabulary;
pub mod xml_output;
pub mod xml_reader;

// For tests, we only initialize logging once.
#[cfg(test)]
use std::sync::Once;

#[cfg(test)]
static LOGGER_INIT: Once = Once::new();

// Rust runs the tests concurrently, so unless we synchronize logging access
// it will crash when attempting to run `cargo test` with some logging facilities.
#[cfg(test)]
pub fn ensure_env_logger_initialized() {
    use std::io::Write;

    LOGGER_INIT.call_once(|| {
        let mut builder = env_logger::Builder::from_default_env();
        builder
            .format(|buf, record| writeln!(buf, "[{}] - {}", record.level(), record.args()))
            .init();
    });
}
