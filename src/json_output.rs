//! JSON rendering of a model.
//!
//! The model is written as an array of items in model order. Vocabulary
//! values are rendered as their text tokens, entries keep their order.

use crate::ParserSettings;
use crate::err::SerializationResult;
use crate::syschar_model::SyscharModel;
use crate::sysitem::SysItem;

use log::trace;
use serde_json::Value;
use std::io::Write;

pub fn render_model(
    model: &SyscharModel,
    settings: &ParserSettings,
) -> SerializationResult<String> {
    let items: Vec<&SysItem> = model.items().collect();
    trace!("rendering {} items as JSON", items.len());

    let rendered = if settings.should_indent() {
        serde_json::to_string_pretty(&items)?
    } else {
        serde_json::to_string(&items)?
    };
    Ok(rendered)
}

pub fn write_model<W: Write>(
    model: &SyscharModel,
    settings: &ParserSettings,
    mut target: W,
) -> SerializationResult<()> {
    let items: Vec<&SysItem> = model.items().collect();

    if settings.should_indent() {
        serde_json::to_writer_pretty(&mut target, &items)?;
        target.write_all(b"\n")?;
    } else {
        serde_json::to_writer(&mut target, &items)?;
    }
    Ok(())
}

/// One item as a JSON value.
pub fn item_value(item: &SysItem) -> SerializationResult<Value> {
    Ok(serde_json::to_value(item)?)
}
