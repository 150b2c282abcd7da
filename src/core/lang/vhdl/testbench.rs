//! Generation of a testbench skeleton around a parsed entity.

use std::path::{Path, PathBuf};

use super::format::TbFormat;
use super::symbols::entity::{Entity, Span};

/// Placeholder written into the generic map for generics without a default.
pub const NO_VALUE: &str = "NO_VAL";

/// File extension given to generated testbenches.
pub const VHDL_EXT: &str = "vhd";

/// Derives the identifier of the testbench entity.
///
/// Without a `target` the name is `<entity>_tb`; otherwise it is the target's
/// file name up to its first `.`. Returns `None` if that leaves nothing.
pub fn harness_name(entity: &str, target: Option<&Path>) -> Option<String> {
    let name = match target {
        None => format!("{}_tb", entity),
        Some(path) => {
            let file = path.file_name()?.to_str()?;
            match file.find('.') {
                Some(i) => file[..i].to_string(),
                None => file.to_string(),
            }
        }
    };
    match name.is_empty() {
        true => None,
        false => Some(name),
    }
}

/// The file a testbench named `harness` is written to by default.
pub fn default_target(harness: &str) -> PathBuf {
    PathBuf::from(format!("{}.{}", harness, VHDL_EXT))
}

#[derive(Debug)]
pub struct Testbench<'a> {
    entity: &'a Entity,
    name: String,
    fmt: &'a TbFormat,
}

impl<'a> Testbench<'a> {
    pub fn new(entity: &'a Entity, name: &str, fmt: &'a TbFormat) -> Self {
        Self {
            entity: entity,
            name: name.to_string(),
            fmt: fmt,
        }
    }

    /// Accesses the testbench entity's identifier.
    pub fn get_name(&self) -> &str {
        &self.name
    }

    /// Writes out the complete testbench.
    ///
    /// `source` must be the same text the entity was parsed from; its library
    /// clauses and entity interface are copied from it line by line.
    pub fn generate(&self, source: &str) -> String {
        let lines: Vec<&str> = source.lines().collect();
        let mut result = String::new();

        if let Some(span) = self.entity.get_library_span() {
            for line in copy_span(&lines, span) {
                result.push_str(line);
                result.push('\n');
            }
        }
        result.push_str(&format!("\nentity {} is\nend entity;\n", self.name));
        result.push_str(&format!(
            "\narchitecture {} of {} is\n\n",
            self.fmt.get_architecture_name(),
            self.name
        ));
        result.push_str(&self.into_component(&lines));
        result.push('\n');
        result.push_str(&self.into_signals());
        result.push_str("\nbegin\n\n");
        result.push_str(&self.into_instance());
        result.push_str("\nend architecture;\n");
        result
    }

    /// Generates the component declaration from the entity's source lines.
    fn into_component(&self, lines: &[&str]) -> String {
        let indent = self.fmt.indent(1);
        let mut result = format!("{}component {} is", indent, self.entity.get_name());
        if let Some(header) = self.entity.get_header() {
            result.push(' ');
            result.push_str(header);
        }
        result.push('\n');
        for line in copy_span(lines, self.entity.get_body_span()) {
            if line.is_empty() == false {
                result.push_str(&indent);
                result.push_str(line);
            }
            result.push('\n');
        }
        if let Some(trailer) = self.entity.get_trailer() {
            result.push_str(&indent);
            result.push_str(trailer);
            result.push('\n');
        }
        result.push_str(&format!("{}end component;\n", indent));
        result
    }

    /// Generates one signal declaration per port.
    fn into_signals(&self) -> String {
        let indent = self.fmt.indent(1);
        self.entity
            .get_ports()
            .iter()
            .map(|p| {
                let init = match p.get_default() {
                    Some(value) => format!(" := {}", value),
                    None => String::new(),
                };
                format!(
                    "{}signal {}: {}{};\n",
                    indent,
                    p.get_name(),
                    p.get_type(),
                    init
                )
            })
            .collect()
    }

    /// Generates the instantiation of the entity under test.
    fn into_instance(&self) -> String {
        let indent = self.fmt.indent(1);
        let mut result = format!(
            "{}{}: {}",
            indent,
            self.fmt.get_instance_name(),
            self.entity.get_name()
        );
        let generics = self.entity.get_generics();
        if generics.is_empty() == false {
            let mapping = generics
                .iter()
                .map(|g| (g.get_name(), g.get_default().unwrap_or(NO_VALUE)));
            result.push_str(" generic ");
            result.push_str(&self.into_map(mapping));
        }
        let ports = self.entity.get_ports();
        if ports.is_empty() == false {
            let mapping = ports.iter().map(|p| (p.get_name(), p.get_name()));
            result.push_str(" port ");
            result.push_str(&self.into_map(mapping));
        }
        result.push_str(";\n");
        result
    }

    /// Writes a `map ( ... )` association list with one `lhs => rhs` per line.
    fn into_map<'b, I>(&self, pairs: I) -> String
    where
        I: Iterator<Item = (&'b str, &'b str)>,
    {
        let inner = self.fmt.indent(2);
        let entries: Vec<String> = pairs
            .map(|(lhs, rhs)| format!("{}{} => {}", inner, lhs, rhs))
            .collect();
        format!("map (\n{}\n{})", entries.join(",\n"), self.fmt.indent(1))
    }
}

/// Iterates the lines covered by `span`, stopping early if the source is
/// shorter than expected.
fn copy_span<'s>(lines: &'s [&'s str], span: &Span) -> impl Iterator<Item = &'s str> + 's {
    lines
        .iter()
        .skip(span.start())
        .take(span.len())
        .map(|l| *l)
}
