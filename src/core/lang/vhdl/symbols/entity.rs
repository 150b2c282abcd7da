use serde_derive::Serialize;

use crate::core::lang::vhdl::error::VhdlError;
use crate::core::lang::vhdl::interface::{Generic, ListLine, Port};
use crate::core::lang::vhdl::line::{after_open_paren, strip_comment, LineKind};

/// A half-open range of 0-indexed source lines.
#[derive(Debug, PartialEq, Clone, Copy, Serialize)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Creates a span covering only line `n`.
    fn line(n: usize) -> Self {
        Self::new(n, n + 1)
    }

    /// Moves the end of the span so that line `n` is included.
    fn extend_to(&mut self, n: usize) -> () {
        if n + 1 > self.end {
            self.end = n + 1;
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Where the scan over the source code currently is.
#[derive(Debug, PartialEq, Clone, Copy)]
enum State {
    SeekLibrary,
    InLibrary,
    SeekEntity,
    InEntityHeader,
    InGenericList,
    InPortList,
    Closed,
}

impl State {
    fn before_entity(&self) -> bool {
        match self {
            Self::SeekLibrary | Self::InLibrary | Self::SeekEntity => true,
            _ => false,
        }
    }

    fn in_entity(&self) -> bool {
        match self {
            Self::InEntityHeader | Self::InGenericList | Self::InPortList => true,
            _ => false,
        }
    }
}

/// The interface of a single VHDL entity along with the line ranges needed to
/// copy parts of its source code.
#[derive(Debug, PartialEq, Serialize)]
pub struct Entity {
    #[serde(rename = "identifier")]
    name: String,
    generics: Vec<Generic>,
    ports: Vec<Port>,
    /// Text following `is` on the entity's first line.
    #[serde(skip_serializing)]
    header: Option<String>,
    #[serde(skip_serializing)]
    library: Option<Span>,
    /// Text in front of `end` when the closing line is not the entity's first.
    #[serde(skip_serializing)]
    trailer: Option<String>,
    /// Lines strictly between the `entity` line and the `end` line.
    #[serde(skip_serializing)]
    body: Span,
    #[serde(skip_serializing)]
    generic_list: Option<Span>,
    #[serde(skip_serializing)]
    port_list: Option<Span>,
}

impl Entity {
    /// Extracts the first entity declared in `source`.
    pub fn from_source(source: &str) -> Result<Self, VhdlError> {
        Self::from_lines(source.lines())
    }

    /// Extracts the first entity from a sequence of source lines.
    ///
    /// Lines are consumed only up to the entity's closing `end`.
    pub fn from_lines<I, S>(lines: I) -> Result<Self, VhdlError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = EntityBuilder::new();
        for (n, line) in lines.into_iter().enumerate() {
            builder.step(n, line.as_ref())?;
            if builder.is_closed() == true {
                break;
            }
        }
        builder.finish()
    }

    /// Accesses the entity's identifier.
    pub fn get_name(&self) -> &str {
        &self.name
    }

    /// Accesses the entity's generics in declaration order.
    pub fn get_generics(&self) -> &Vec<Generic> {
        &self.generics
    }

    /// Accesses the entity's ports in declaration order.
    pub fn get_ports(&self) -> &Vec<Port> {
        &self.ports
    }

    pub fn get_header(&self) -> Option<&str> {
        self.header.as_deref()
    }

    /// Accesses the code sharing the closing line with `end`, such as `);`.
    pub fn get_trailer(&self) -> Option<&str> {
        self.trailer.as_deref()
    }

    /// References the lines holding the library and use clauses, if any.
    pub fn get_library_span(&self) -> Option<&Span> {
        self.library.as_ref()
    }

    pub fn get_body_span(&self) -> &Span {
        &self.body
    }

    pub fn get_generic_list_span(&self) -> Option<&Span> {
        self.generic_list.as_ref()
    }

    pub fn get_port_list_span(&self) -> Option<&Span> {
        self.port_list.as_ref()
    }

    /// Counts the generics that were declared without a default value.
    pub fn count_missing_defaults(&self) -> usize {
        self.generics
            .iter()
            .filter(|g| g.get_default().is_none())
            .count()
    }
}

#[derive(Debug)]
struct EntityBuilder {
    state: State,
    name: Option<String>,
    header: Option<String>,
    generics: Vec<Generic>,
    ports: Vec<Port>,
    library: Option<Span>,
    entity_line: Option<usize>,
    end_line: Option<usize>,
    /// Length of the closing line's text starting from `end`.
    end_len: usize,
    trailer: Option<String>,
    generic_list: Option<Span>,
    port_list: Option<Span>,
}

impl EntityBuilder {
    fn new() -> Self {
        Self {
            state: State::SeekLibrary,
            name: None,
            header: None,
            generics: Vec::new(),
            ports: Vec::new(),
            library: None,
            entity_line: None,
            end_line: None,
            end_len: 0,
            trailer: None,
            generic_list: None,
            port_list: None,
        }
    }

    fn is_closed(&self) -> bool {
        self.state == State::Closed
    }

    /// Advances the scan by the raw source line `n`.
    fn step(&mut self, n: usize, line: &str) -> Result<(), VhdlError> {
        let line = strip_comment(line).trim();
        self.process(n, line)?;
        if self.is_closed() == true {
            self.split_closing_line(n, line);
        }
        Ok(())
    }

    /// Keeps the code written in front of `end` on the closing line.
    fn split_closing_line(&mut self, n: usize, line: &str) -> () {
        // `end` was found in a suffix of the line
        let len = self.end_len;
        let before = |text: &str| {
            text.get(..text.len().saturating_sub(len))
                .map(|t| t.trim_end().to_string())
                .filter(|t| t.is_empty() == false)
        };
        match self.entity_line == Some(n) {
            true => self.header = self.header.as_deref().and_then(before),
            false => self.trailer = before(line),
        }
    }

    fn process(&mut self, n: usize, text: &str) -> Result<(), VhdlError> {
        let kind = match LineKind::classify(text) {
            Some(k) => k,
            None => return Ok(()),
        };
        match kind {
            LineKind::Library | LineKind::Use => self.library_clause(n),
            LineKind::Entity => self.entity_header(n, text)?,
            LineKind::Generic => self.open_list(n, text, State::InGenericList)?,
            LineKind::Port => self.open_list(n, text, State::InPortList)?,
            LineKind::Delimiter => {
                self.close_list(n);
                if let Some((_, rest)) = text.split_once(')') {
                    self.resume(n, rest)?;
                }
            }
            LineKind::End => {
                if self.state.in_entity() == true {
                    self.end_line = Some(n);
                    self.end_len = text.len();
                    self.state = State::Closed;
                }
            }
            LineKind::Continuation => match self.state {
                State::InGenericList | State::InPortList => self.declarations(n, text)?,
                State::InLibrary => self.state = State::SeekEntity,
                _ => (),
            },
        }
        Ok(())
    }

    /// Processes the code following a list's closing `)` on line `n`.
    fn resume(&mut self, n: usize, rest: &str) -> Result<(), VhdlError> {
        let rest = rest.trim_start();
        let rest = rest.strip_prefix(';').unwrap_or(rest).trim_start();
        match rest.is_empty() {
            true => Ok(()),
            false => self.process(n, rest),
        }
    }

    fn library_clause(&mut self, n: usize) -> () {
        if self.state.before_entity() == false {
            return;
        }
        self.library.get_or_insert(Span::line(n)).extend_to(n);
        self.state = State::InLibrary;
    }

    fn entity_header(&mut self, n: usize, text: &str) -> Result<(), VhdlError> {
        // only the first entity is read
        if self.state.before_entity() == false {
            return Ok(());
        }
        let rest = match text.split_once(char::is_whitespace) {
            Some((_, r)) => r.trim_start(),
            None => return Err(VhdlError::MissingEntityName),
        };
        let (name, rest) = match rest.split_once(char::is_whitespace) {
            Some((name, r)) => (name, r.trim_start()),
            None => (rest, ""),
        };
        if name.is_empty() == true {
            return Err(VhdlError::MissingEntityName);
        }
        // skip past the 'is' keyword
        let rest = match rest.split_once(char::is_whitespace) {
            Some((kw, r)) if kw.eq_ignore_ascii_case("is") => r.trim_start(),
            None if rest.eq_ignore_ascii_case("is") => "",
            _ => rest,
        };
        self.name = Some(name.to_string());
        self.entity_line = Some(n);
        self.state = State::InEntityHeader;
        if rest.is_empty() == false {
            self.header = Some(rest.to_string());
            self.process(n, rest)?;
        }
        Ok(())
    }

    fn open_list(&mut self, n: usize, text: &str, list: State) -> Result<(), VhdlError> {
        if self.state.in_entity() == false {
            return Ok(());
        }
        self.state = list;
        match list {
            State::InGenericList => self.generic_list = Some(Span::line(n)),
            _ => self.port_list = Some(Span::line(n)),
        }
        match after_open_paren(text) {
            Some(rest) => self.declarations(n, rest),
            None => Ok(()),
        }
    }

    fn close_list(&mut self, n: usize) -> () {
        match self.state {
            State::InGenericList => {
                if let Some(span) = &mut self.generic_list {
                    span.extend_to(n);
                }
            }
            State::InPortList => {
                if let Some(span) = &mut self.port_list {
                    span.extend_to(n);
                }
            }
            // delimiter outside of a list has no effect
            _ => return,
        }
        self.state = State::InEntityHeader;
    }

    fn declarations(&mut self, n: usize, text: &str) -> Result<(), VhdlError> {
        let text = text.trim();
        let text = text.strip_prefix('(').unwrap_or(text);
        let line = ListLine::parse(text, self.state == State::InPortList);
        for decl in line.declarations {
            match self.state {
                State::InGenericList => self.generics.append(&mut decl.into_generics()),
                _ => self.ports.append(&mut decl.into_ports()),
            }
        }
        let span = match self.state {
            State::InGenericList => &mut self.generic_list,
            _ => &mut self.port_list,
        };
        if let Some(span) = span {
            span.extend_to(n);
        }
        match line.remainder {
            Some(rest) => {
                self.close_list(n);
                self.resume(n, rest)
            }
            None => Ok(()),
        }
    }

    fn finish(self) -> Result<Entity, VhdlError> {
        let (name, entity_line) = match (self.name, self.entity_line) {
            (Some(name), Some(line)) => (name, line),
            _ => return Err(VhdlError::MissingEntity),
        };
        let end_line = match self.end_line {
            Some(line) => line,
            None => return Err(VhdlError::UnterminatedEntity(name)),
        };
        Ok(Entity {
            name: name,
            generics: self.generics,
            ports: self.ports,
            header: self.header,
            library: self.library,
            trailer: self.trailer,
            body: Span::new(entity_line + 1, end_line.max(entity_line + 1)),
            generic_list: self.generic_list,
            port_list: self.port_list,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const ADDER: &str = "\
-- a simple adder
library ieee;
use ieee.std_logic_1164.all;
use ieee.numeric_std.all;

entity adder is
    generic (
        WIDTH : positive := 8;
        SIGNED_MATH : boolean
    );
    port (
        a, b : in std_logic_vector(WIDTH-1 downto 0);
        cin  : in std_logic := '0';
        sum  : out std_logic_vector(WIDTH-1 downto 0);
        cout : out std_logic
    );
end entity;

architecture rtl of adder is
begin
end architecture;
";

    #[test]
    fn parse_adder() {
        let ent = Entity::from_source(ADDER).unwrap();
        assert_eq!(ent.get_name(), "adder");
        assert_eq!(
            ent.get_generics()
                .iter()
                .map(|g| g.get_name())
                .collect::<Vec<&str>>(),
            vec!["WIDTH", "SIGNED_MATH"]
        );
        assert_eq!(ent.get_generics()[0].get_default(), Some("8"));
        assert_eq!(ent.get_generics()[1].get_default(), None);
        assert_eq!(ent.count_missing_defaults(), 1);
        assert_eq!(
            ent.get_ports()
                .iter()
                .map(|p| p.get_name())
                .collect::<Vec<&str>>(),
            vec!["a", "b", "cin", "sum", "cout"]
        );
        assert_eq!(ent.get_ports()[1].get_type(), "std_logic_vector(WIDTH-1 downto 0)");
        assert_eq!(ent.get_ports()[2].get_default(), Some("'0'"));
        assert_eq!(ent.get_ports()[4].get_direction(), Some("out"));
    }

    #[test]
    fn adder_spans() {
        let ent = Entity::from_source(ADDER).unwrap();
        assert_eq!(ent.get_library_span(), Some(&Span::new(1, 4)));
        assert_eq!(ent.get_body_span(), &Span::new(6, 16));
        assert_eq!(ent.get_generic_list_span(), Some(&Span::new(6, 10)));
        assert_eq!(ent.get_port_list_span(), Some(&Span::new(10, 16)));
        assert_eq!(ent.get_header(), None);
    }

    #[test]
    fn no_library_clauses() {
        let s = "\
entity inv is
  port (
    x : in bit;
    y : out bit
  );
end inv;
";
        let ent = Entity::from_source(s).unwrap();
        assert_eq!(ent.get_library_span(), None);
        assert_eq!(ent.get_generic_list_span(), None);
        assert_eq!(ent.get_ports().len(), 2);
        assert_eq!(ent.count_missing_defaults(), 0);
    }

    #[test]
    fn interleaved_library_clauses() {
        let s = "\
library ieee;
use ieee.std_logic_1164.all;
library work;
use work.types.all;
-- comment between

entity e is
  port ( clk : in std_logic );
end;
";
        let ent = Entity::from_source(s).unwrap();
        assert_eq!(ent.get_library_span(), Some(&Span::new(0, 4)));
        assert_eq!(ent.get_ports().len(), 1);
        assert_eq!(ent.get_ports()[0].get_type(), "std_logic");
    }

    #[test]
    fn declarations_on_list_lines() {
        let s = "\
entity counter is
  generic(N : natural := 4);
  port(clk, rst : in std_logic;
       q : out unsigned(N-1 downto 0));
end entity counter;
";
        let ent = Entity::from_source(s).unwrap();
        assert_eq!(ent.get_generics().len(), 1);
        assert_eq!(ent.get_generics()[0].get_name(), "N");
        assert_eq!(ent.get_generic_list_span(), Some(&Span::new(1, 2)));
        assert_eq!(
            ent.get_ports()
                .iter()
                .map(|p| p.get_name())
                .collect::<Vec<&str>>(),
            vec!["clk", "rst", "q"]
        );
        assert_eq!(ent.get_ports()[2].get_type(), "unsigned(N-1 downto 0)");
        assert_eq!(ent.get_port_list_span(), Some(&Span::new(2, 4)));
        assert_eq!(ent.get_body_span(), &Span::new(1, 4));
    }

    #[test]
    fn header_remainder_is_parsed() {
        let s = "entity buf is port (a : in bit; y : out bit);\nend buf;";
        let ent = Entity::from_source(s).unwrap();
        assert_eq!(ent.get_header(), Some("port (a : in bit; y : out bit);"));
        assert_eq!(ent.get_ports().len(), 2);
        assert_eq!(ent.get_body_span(), &Span::new(1, 1));
    }

    #[test]
    fn end_on_entity_line() {
        let s = "\
entity buf is port (a : in bit; y : out bit); end buf;

architecture rtl of buf is
begin
  y <= a;
end architecture;
";
        let ent = Entity::from_source(s).unwrap();
        assert_eq!(ent.get_name(), "buf");
        assert_eq!(ent.get_ports().len(), 2);
        assert_eq!(ent.get_header(), Some("port (a : in bit; y : out bit);"));
        assert_eq!(ent.get_trailer(), None);
        assert_eq!(ent.get_body_span(), &Span::new(1, 1));
    }

    #[test]
    fn end_after_closing_paren() {
        let s = "\
entity e is
  port (
    a : in bit;
    y : out bit ); end e;

architecture rtl of e is
begin
end architecture;
";
        let ent = Entity::from_source(s).unwrap();
        assert_eq!(ent.get_ports().len(), 2);
        assert_eq!(ent.get_port_list_span(), Some(&Span::new(1, 4)));
        assert_eq!(ent.get_body_span(), &Span::new(1, 3));
        assert_eq!(ent.get_trailer(), Some("y : out bit );"));

        let s = "entity e is\n  port ( a : in bit\n  ); end;\n";
        let ent = Entity::from_source(s).unwrap();
        assert_eq!(ent.get_body_span(), &Span::new(1, 2));
        assert_eq!(ent.get_trailer(), Some(");"));
    }

    #[test]
    fn port_list_opens_after_delimiter() {
        let s = "\
entity e is
  generic ( N : natural := 2
  ); port (
    a : in bit
  );
end e;
";
        let ent = Entity::from_source(s).unwrap();
        assert_eq!(ent.get_generics().len(), 1);
        assert_eq!(ent.get_ports().len(), 1);
        assert_eq!(ent.get_ports()[0].get_name(), "a");
        assert_eq!(ent.get_generic_list_span(), Some(&Span::new(1, 3)));
        assert_eq!(ent.get_port_list_span(), Some(&Span::new(2, 5)));

        let s = "entity e is\n  generic ( N : natural := 2 ); port (\n    a : in bit );\nend e;\n";
        let ent = Entity::from_source(s).unwrap();
        assert_eq!(ent.get_generics().len(), 1);
        assert_eq!(ent.get_ports().len(), 1);
    }

    #[test]
    fn comments_inside_lists() {
        let s = "\
entity e is
  port (
    -- clock input
    clk : in std_logic; -- rising edge
    d   : in std_logic  -- data
  );
end e;
";
        let ent = Entity::from_source(s).unwrap();
        assert_eq!(ent.get_ports().len(), 2);
        assert_eq!(ent.get_ports()[1].get_type(), "std_logic");
    }

    #[test]
    fn open_paren_on_its_own_line() {
        let s = "\
entity e is
  port
  (a : in bit;
   b : out bit
  );
end e;
";
        let ent = Entity::from_source(s).unwrap();
        assert_eq!(
            ent.get_ports()
                .iter()
                .map(|p| p.get_name())
                .collect::<Vec<&str>>(),
            vec!["a", "b"]
        );
    }

    #[test]
    fn scan_stops_at_end() {
        let s = "\
entity first is
  port ( a : in bit );
end first;
entity second is
  port ( z : in bit );
end second;
";
        let ent = Entity::from_source(s).unwrap();
        assert_eq!(ent.get_name(), "first");
        assert_eq!(ent.get_ports().len(), 1);
    }

    #[test]
    fn end_before_entity_is_ignored() {
        let s = "\
package p is
end package;
entity e is
  port ( a : in bit );
end e;
";
        let ent = Entity::from_source(s).unwrap();
        assert_eq!(ent.get_name(), "e");
        assert_eq!(ent.get_body_span(), &Span::new(3, 4));
    }

    #[test]
    fn stray_delimiter_is_no_op() {
        let s = "\
entity e is
  );
  port (
    a : in bit
  );
end e;
";
        let ent = Entity::from_source(s).unwrap();
        assert_eq!(ent.get_ports().len(), 1);
        assert_eq!(ent.get_port_list_span(), Some(&Span::new(2, 5)));
    }

    #[test]
    fn missing_entity() {
        assert_eq!(Entity::from_source(""), Err(VhdlError::MissingEntity));
        assert_eq!(
            Entity::from_source("library ieee;\nuse ieee.std_logic_1164.all;\n"),
            Err(VhdlError::MissingEntity)
        );
    }

    #[test]
    fn missing_entity_name() {
        assert_eq!(
            Entity::from_source("entity\nend;"),
            Err(VhdlError::MissingEntityName)
        );
    }

    #[test]
    fn unterminated_entity() {
        assert_eq!(
            Entity::from_source("entity e is\n  port ( a : in bit );\n"),
            Err(VhdlError::UnterminatedEntity(String::from("e")))
        );
    }

    #[test]
    fn from_lines_matches_from_source() {
        let lines: Vec<String> = ADDER.lines().map(|l| l.to_string()).collect();
        assert_eq!(
            Entity::from_lines(lines).unwrap(),
            Entity::from_source(ADDER).unwrap()
        );
    }
}
