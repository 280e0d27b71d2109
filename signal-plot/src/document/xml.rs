//! XML signal document parser using roxmltree
//!
//! Expected shape (the root element name is not checked):
//!
//! ```xml
//! <Signals>
//!   <Constants>
//!     <Constant name="t1" value="10ms"/>
//!   </Constants>
//!   <Signal name="CLK" remark="main clock">
//!     <SamplePoint time="0ms" logic="false"/>
//!     <SamplePoint time="t1" logic="transition" remark="edge"/>
//!   </Signal>
//! </Signals>
//! ```

use crate::document::{ConstantDecl, Document, SampleDecl, SignalDecl};
use crate::types::{LogicState, PlotError, Result};
use roxmltree::Node;
use std::path::Path;

const CONSTANTS: &str = "Constants";
const CONSTANT: &str = "Constant";
const SIGNAL: &str = "Signal";
const SAMPLE_POINT: &str = "SamplePoint";

/// Read and parse a signal document from disk
pub fn load_document(path: &Path) -> Result<Document> {
    log::info!("Loading signal document: {:?}", path);

    let text = std::fs::read_to_string(path)?;
    parse_document(&text)
}

/// Parse a signal document from XML text
pub fn parse_document(xml: &str) -> Result<Document> {
    let tree = roxmltree::Document::parse(xml).map_err(|e| PlotError::Xml(e.to_string()))?;
    let root = tree.root_element();

    let mut document = Document::new();

    for child in root.children().filter(Node::is_element) {
        match child.tag_name().name() {
            CONSTANTS => parse_constants(child, &mut document.constants)?,
            SIGNAL => document.signals.push(parse_signal(child)?),
            other => log::debug!("Skipping unknown element <{}>", other),
        }
    }

    log::debug!(
        "Parsed document: {} constants, {} signals, {} sample points",
        document.constants.len(),
        document.signals.len(),
        document.num_samples()
    );

    Ok(document)
}

fn parse_constants(node: Node, constants: &mut Vec<ConstantDecl>) -> Result<()> {
    for child in node.children().filter(Node::is_element) {
        if child.tag_name().name() != CONSTANT {
            log::debug!("Skipping <{}> inside <{}>", child.tag_name().name(), CONSTANTS);
            continue;
        }

        constants.push(ConstantDecl {
            name: required_attribute(child, "name")?.to_string(),
            value: required_attribute(child, "value")?.to_string(),
        });
    }

    Ok(())
}

fn parse_signal(node: Node) -> Result<SignalDecl> {
    let mut signal = SignalDecl::new(required_attribute(node, "name")?);
    signal.remark = node.attribute("remark").map(str::to_string);

    for child in node.children().filter(Node::is_element) {
        if child.tag_name().name() != SAMPLE_POINT {
            log::debug!(
                "Skipping <{}> inside signal '{}'",
                child.tag_name().name(),
                signal.name
            );
            continue;
        }

        signal.samples.push(SampleDecl {
            time: required_attribute(child, "time")?.to_string(),
            logic: LogicState::parse(required_attribute(child, "logic")?)?,
            remark: child.attribute("remark").map(str::to_string),
        });
    }

    Ok(signal)
}

fn required_attribute<'a>(node: Node<'a, '_>, attribute: &str) -> Result<&'a str> {
    node.attribute(attribute)
        .ok_or_else(|| PlotError::missing_attribute(node.tag_name().name(), attribute))
}
