use std::io::{Cursor, Write};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use retropom_core::LicenseEntry;

use crate::element::{Element, licenses_block};
use crate::PomError;

/// Append the Apache 2.0 `<licenses>` block as the last child of the root element.
///
/// Not idempotent: running it on its own output adds a second block.
pub fn inject_license(content: &str) -> Result<String, PomError> {
    inject_licenses(content, &[LicenseEntry::apache_2_0()])
}

/// Append a `<licenses>` block holding `entries` as the last child of the root element and
/// re-serialize the document with one element per line.
///
/// The indent unit follows the input (see [`detect_indent`]). Whitespace-only text between
/// elements is regenerated and elements without content are written self-closing; text runs,
/// entity references, CDATA and comments are copied through unchanged.
pub fn inject_licenses(content: &str, entries: &[LicenseEntry]) -> Result<String, PomError> {
    let block = licenses_block(entries);
    let (indent_char, indent_size) = detect_indent(content);

    let mut reader = Reader::from_str(content);
    let mut out = IndentedCopy::new(Writer::new_with_indent(
        Cursor::new(Vec::new()),
        indent_char,
        indent_size,
    ));
    let mut tracker = RootTracker::default();

    loop {
        let offset = reader.buffer_position();
        let event = reader
            .read_event()
            .map_err(|e| PomError::parse(reader.error_position(), e))?;
        let position = reader.buffer_position();

        if offset == 0 && !matches!(event, Event::Decl(_) | Event::Eof) {
            out.emit(Event::Decl(default_decl()))?;
        }

        match event {
            Event::Start(e) => {
                tracker.open(position, &e)?;
                out.start(e)?;
            }
            Event::Empty(e) => {
                if tracker.empty(position, &e)? {
                    // self-closing root: expand so the block has somewhere to go
                    let end = e.to_end().into_owned();
                    out.start(e)?;
                    out.close(end, Some(&block))?;
                } else {
                    out.markup(Event::Empty(e))?;
                }
            }
            Event::End(e) => {
                let closes_root = tracker.close(position)?;
                out.close(e, closes_root.then_some(&block))?;
            }
            Event::Text(e) if is_blank(&e) => {
                if tracker.inside_root() {
                    out.blank(e)?;
                }
            }
            Event::Text(e) => {
                tracker.text(position)?;
                out.text(Event::Text(e))?;
            }
            Event::GeneralRef(e) => {
                tracker.text(position)?;
                let raw = format!("&{};", String::from_utf8_lossy(&e));
                out.text(Event::Text(BytesText::from_escaped(raw)))?;
            }
            Event::CData(e) => {
                tracker.text(position)?;
                let raw = format!("<![CDATA[{}]]>", String::from_utf8_lossy(&e));
                out.text(Event::Text(BytesText::from_escaped(raw)))?;
            }
            Event::Comment(e) => out.markup(Event::Comment(e))?,
            Event::PI(e) => out.markup(Event::PI(e))?,
            Event::Decl(e) => {
                tracker.decl(offset)?;
                out.markup(Event::Decl(e))?;
            }
            Event::DocType(e) => out.markup(Event::DocType(e))?,
            Event::Eof => break,
        }
    }
    tracker.finish(reader.buffer_position())?;

    let mut result = out.into_string()?;
    result.push('\n');
    Ok(result)
}

/// Read a document into an [`Element`] tree and return its root.
///
/// Applies the same well-formedness rules as [`inject_licenses`]. The five predefined
/// entities and character references are resolved. Whitespace-only text is kept when it is
/// part of a text run and dropped between elements; comments, processing instructions and
/// the prolog are dropped.
pub fn parse_document(content: &str) -> Result<Element, PomError> {
    let mut reader = Reader::from_str(content);
    let mut tracker = RootTracker::default();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;
    let mut pending_blank: Option<String> = None;
    let mut in_text = false;

    loop {
        let offset = reader.buffer_position();
        let event = reader
            .read_event()
            .map_err(|e| PomError::parse(reader.error_position(), e))?;
        let position = reader.buffer_position();

        let text = match event {
            Event::Start(e) => {
                tracker.open(position, &e)?;
                stack.push(element_from_start(position, &e)?);
                None
            }
            Event::Empty(e) => {
                tracker.empty(position, &e)?;
                let element = element_from_start(position, &e)?;
                attach(&mut stack, &mut root, element);
                None
            }
            Event::End(_) => {
                tracker.close(position)?;
                if let Some(element) = stack.pop() {
                    attach(&mut stack, &mut root, element);
                }
                None
            }
            Event::Text(e) if is_blank(&e) => {
                let blank = String::from_utf8_lossy(&e).into_owned();
                match stack.last_mut() {
                    Some(current) if in_text => current.text.push_str(&blank),
                    _ => pending_blank = Some(blank),
                }
                continue;
            }
            Event::Text(e) => {
                tracker.text(position)?;
                Some(String::from_utf8_lossy(&e).into_owned())
            }
            Event::GeneralRef(e) => {
                tracker.text(position)?;
                Some(resolve_reference(&String::from_utf8_lossy(&e)))
            }
            Event::CData(e) => {
                tracker.text(position)?;
                Some(String::from_utf8_lossy(&e).into_owned())
            }
            Event::Decl(_) => {
                tracker.decl(offset)?;
                None
            }
            Event::Comment(_) | Event::PI(_) | Event::DocType(_) => None,
            Event::Eof => break,
        };

        match text {
            Some(text) => {
                if let Some(current) = stack.last_mut() {
                    if let Some(blank) = pending_blank.take() {
                        current.text.push_str(&blank);
                    }
                    current.text.push_str(&text);
                }
                in_text = true;
            }
            None => {
                pending_blank = None;
                in_text = false;
            }
        }
    }
    tracker.finish(reader.buffer_position())?;

    root.ok_or_else(|| PomError::parse(reader.buffer_position(), "no root element"))
}

/// Number of `<licenses>` blocks directly under the root element
pub fn count_licenses_blocks(content: &str) -> Result<usize, PomError> {
    let root = parse_document(content)?;
    Ok(root.find_all("licenses").count())
}

/// Detect the indent unit of an XML document from its first indented line.
///
/// Returns the indent character and how many of it make one level; defaults to four spaces.
#[must_use]
pub fn detect_indent(content: &str) -> (u8, usize) {
    for line in content.lines() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.len() == line.len() {
            continue;
        }
        if line.starts_with('\t') {
            return (b'\t', 1);
        }
        let spaces = line.len() - line.trim_start_matches(' ').len();
        if spaces > 0 {
            return (b' ', spaces);
        }
    }
    (b' ', 4)
}

/// Copies events into an indenting writer while keeping text runs on one line.
///
/// A start tag is held back until the next event so an element without content can be
/// written self-closing. Blank text is held back until it is known to belong to a text run.
/// Every piece of a text run goes out as a `Text` event, which the writer never indents.
struct IndentedCopy<'a, W: Write> {
    writer: Writer<W>,
    pending_start: Option<BytesStart<'a>>,
    pending_blank: Option<BytesText<'a>>,
    in_text: bool,
}

impl<'a, W: Write> IndentedCopy<'a, W> {
    fn new(writer: Writer<W>) -> Self {
        Self {
            writer,
            pending_start: None,
            pending_blank: None,
            in_text: false,
        }
    }

    fn emit(&mut self, event: Event<'_>) -> Result<(), PomError> {
        self.writer.write_event(event).map_err(PomError::serialize)
    }

    fn flush_start(&mut self) -> Result<(), PomError> {
        match self.pending_start.take() {
            Some(start) => self.emit(Event::Start(start)),
            None => Ok(()),
        }
    }

    fn start(&mut self, start: BytesStart<'a>) -> Result<(), PomError> {
        self.flush_start()?;
        self.pending_blank = None;
        self.in_text = false;
        self.pending_start = Some(start);
        Ok(())
    }

    /// Any non-text node; ends the current text run
    fn markup(&mut self, event: Event<'_>) -> Result<(), PomError> {
        self.flush_start()?;
        self.pending_blank = None;
        self.in_text = false;
        self.emit(event)
    }

    fn blank(&mut self, text: BytesText<'a>) -> Result<(), PomError> {
        if self.in_text {
            return self.emit(Event::Text(text));
        }
        self.pending_blank = Some(text);
        Ok(())
    }

    fn text(&mut self, event: Event<'_>) -> Result<(), PomError> {
        self.flush_start()?;
        if let Some(blank) = self.pending_blank.take() {
            self.emit(Event::Text(blank))?;
        }
        self.in_text = true;
        self.emit(event)
    }

    /// Close the current element, writing `block` as its last child when given
    fn close(&mut self, end: BytesEnd<'_>, block: Option<&Element>) -> Result<(), PomError> {
        self.pending_blank = None;
        self.in_text = false;
        match (self.pending_start.take(), block) {
            (Some(start), None) => self.emit(Event::Empty(start)),
            (Some(start), Some(block)) => {
                self.emit(Event::Start(start))?;
                block.write_to(&mut self.writer)?;
                self.emit(Event::End(end))
            }
            (None, block) => {
                if let Some(block) = block {
                    block.write_to(&mut self.writer)?;
                }
                self.emit(Event::End(end))
            }
        }
    }
}

impl IndentedCopy<'_, Cursor<Vec<u8>>> {
    fn into_string(self) -> Result<String, PomError> {
        String::from_utf8(self.writer.into_inner().into_inner()).map_err(PomError::serialize)
    }
}

fn default_decl() -> BytesDecl<'static> {
    BytesDecl::new("1.0", Some("UTF-8"), None)
}

fn is_blank(text: &BytesText<'_>) -> bool {
    text.iter().all(u8::is_ascii_whitespace)
}

fn check_attributes(position: u64, start: &BytesStart<'_>) -> Result<(), PomError> {
    start
        .attributes()
        .try_for_each(|attribute| attribute.map(drop).map_err(|e| PomError::parse(position, e)))
}

fn element_from_start(position: u64, start: &BytesStart<'_>) -> Result<Element, PomError> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()));
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| PomError::parse(position, e))?;
        let raw = String::from_utf8_lossy(&attribute.value);
        let value = quick_xml::escape::unescape(&raw).map_err(|e| PomError::parse(position, e))?;
        element.attributes.push((
            String::from_utf8_lossy(attribute.key.as_ref()).into_owned(),
            value.into_owned(),
        ));
    }
    Ok(element)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.push(element),
        None => *root = Some(element),
    }
}

fn resolve_reference(name: &str) -> String {
    let resolved = match name {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "apos" => Some('\''),
        "quot" => Some('"'),
        _ => name
            .strip_prefix("#x")
            .map(|hex| u32::from_str_radix(hex, 16))
            .or_else(|| name.strip_prefix('#').map(str::parse::<u32>))
            .and_then(Result::ok)
            .and_then(char::from_u32),
    };
    match resolved {
        Some(c) => c.to_string(),
        None => format!("&{name};"),
    }
}

/// Enforces the single-root rule while a document is streamed
#[derive(Default)]
struct RootTracker {
    depth: usize,
    root_name: Option<String>,
    root_closed: bool,
}

impl RootTracker {
    fn inside_root(&self) -> bool {
        self.depth > 0
    }

    fn start_root(&mut self, position: u64, start: &BytesStart<'_>) -> Result<(), PomError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        if let Some(existing) = &self.root_name {
            return Err(PomError::parse(
                position,
                format!("second root element `{name}` after `{existing}`"),
            ));
        }
        self.root_name = Some(name);
        Ok(())
    }

    fn open(&mut self, position: u64, start: &BytesStart<'_>) -> Result<(), PomError> {
        check_attributes(position, start)?;
        if self.depth == 0 {
            self.start_root(position, start)?;
        }
        self.depth += 1;
        Ok(())
    }

    /// Returns true when the self-closing element is the root itself
    fn empty(&mut self, position: u64, start: &BytesStart<'_>) -> Result<bool, PomError> {
        check_attributes(position, start)?;
        if self.depth > 0 {
            return Ok(false);
        }
        self.start_root(position, start)?;
        self.root_closed = true;
        Ok(true)
    }

    /// Returns true when the end tag closes the root element
    fn close(&mut self, position: u64) -> Result<bool, PomError> {
        self.depth = self
            .depth
            .checked_sub(1)
            .ok_or_else(|| PomError::parse(position, "end tag without a matching start tag"))?;
        if self.depth == 0 {
            self.root_closed = true;
            return Ok(true);
        }
        Ok(false)
    }

    /// The declaration may only open the document
    fn decl(&self, offset: u64) -> Result<(), PomError> {
        if offset != 0 {
            return Err(PomError::parse(
                offset,
                "XML declaration is only allowed at the start of the document",
            ));
        }
        Ok(())
    }

    fn text(&self, position: u64) -> Result<(), PomError> {
        if self.depth == 0 {
            return Err(PomError::parse(position, "text outside the root element"));
        }
        Ok(())
    }

    fn finish(&self, position: u64) -> Result<(), PomError> {
        if self.depth > 0 {
            return Err(PomError::parse(
                position,
                format!(
                    "{} unclosed element(s) at end of input inside `{}`",
                    self.depth,
                    self.root_name.as_deref().unwrap_or_default()
                ),
            ));
        }
        if !self.root_closed {
            return Err(PomError::parse(position, "no root element"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use retropom_core::license::{APACHE_2_0_DISTRIBUTION, APACHE_2_0_NAME, APACHE_2_0_URL};
    use rstest::rstest;

    const MINIMAL: &str = "<project><groupId>com.memoizr</groupId></project>";

    fn assert_apache_block(licenses: &Element) {
        assert_eq!(licenses.child_names(), vec!["license"]);
        let license = licenses.find("license").unwrap();
        assert_eq!(license.child_names(), vec!["name", "url", "distribution"]);
        assert_eq!(license.find("name").unwrap().text, APACHE_2_0_NAME);
        assert_eq!(license.find("url").unwrap().text, APACHE_2_0_URL);
        assert_eq!(
            license.find("distribution").unwrap().text,
            APACHE_2_0_DISTRIBUTION
        );
    }

    #[test]
    fn test_inject_license_minimal_project() {
        let output = inject_license(MINIMAL).unwrap();
        let root = parse_document(&output).unwrap();
        assert_eq!(root.name, "project");
        assert_eq!(root.child_names(), vec!["groupId", "licenses"]);
        assert_eq!(root.find("groupId").unwrap().text, "com.memoizr");
        assert_apache_block(root.find("licenses").unwrap());
    }

    #[test]
    fn test_inject_license_pretty_prints() {
        let output = inject_license(MINIMAL).unwrap();
        assert_eq!(
            output,
            r#"<?xml version="1.0" encoding="UTF-8"?>
<project>
    <groupId>com.memoizr</groupId>
    <licenses>
        <license>
            <name>The Apache Software License, Version 2.0</name>
            <url>http://www.apache.org/licenses/LICENSE-2.0.txt</url>
            <distribution>repo</distribution>
        </license>
    </licenses>
</project>
"#
        );
    }

    #[test]
    fn test_inject_license_keeps_existing_children_in_order() {
        let content = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
  <modelVersion>4.0.0</modelVersion>
  <groupId>com.memoizr</groupId>
  <artifactId>retro-optional</artifactId>
  <version>v0.1.4</version>
  <dependencies>
    <dependency>
      <groupId>junit</groupId>
      <artifactId>junit</artifactId>
      <scope>test</scope>
    </dependency>
  </dependencies>
</project>"#;
        let output = inject_license(content).unwrap();
        let root = parse_document(&output).unwrap();
        assert_eq!(
            root.child_names(),
            vec![
                "modelVersion",
                "groupId",
                "artifactId",
                "version",
                "dependencies",
                "licenses"
            ]
        );
        assert_eq!(
            root.attributes,
            vec![(
                "xmlns".to_string(),
                "http://maven.apache.org/POM/4.0.0".to_string()
            )]
        );
        assert_eq!(
            root.find_path("dependencies/dependency/scope")
                .map(|e| e.text.as_str()),
            Some("test")
        );
    }

    #[test]
    fn test_inject_license_follows_input_indent() {
        let content = "<project>\n  <groupId>com.memoizr</groupId>\n</project>";
        let output = inject_license(content).unwrap();
        assert!(output.contains("\n  <groupId>com.memoizr</groupId>\n  <licenses>\n    <license>\n"));
        assert!(output.ends_with("  </licenses>\n</project>\n"));
    }

    #[test]
    fn test_inject_license_keeps_single_declaration() {
        let content = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<project/>";
        let output = inject_license(content).unwrap();
        assert_eq!(output.matches("<?xml").count(), 1);
    }

    #[test]
    fn test_inject_license_expands_self_closing_root() {
        let output = inject_license("<project/>").unwrap();
        let root = parse_document(&output).unwrap();
        assert_eq!(root.child_names(), vec!["licenses"]);
        assert_apache_block(root.find("licenses").unwrap());
    }

    #[test]
    fn test_inject_license_is_not_idempotent() {
        let once = inject_license(MINIMAL).unwrap();
        let twice = inject_license(&once).unwrap();
        let root = parse_document(&twice).unwrap();
        assert_eq!(root.child_names(), vec!["groupId", "licenses", "licenses"]);
        for licenses in root.find_all("licenses") {
            assert_apache_block(licenses);
        }
        assert_eq!(count_licenses_blocks(&twice).unwrap(), 2);
    }

    #[test]
    fn test_inject_license_preserves_existing_licenses() {
        let content = "<project><licenses><license><name>MIT</name></license></licenses></project>";
        let output = inject_license(content).unwrap();
        let root = parse_document(&output).unwrap();
        let blocks: Vec<_> = root.find_all("licenses").collect();
        assert_eq!(blocks.len(), 2);
        assert_eq!(
            blocks[0].find_path("license/name").map(|e| e.text.as_str()),
            Some("MIT")
        );
        assert_apache_block(blocks[1]);
    }

    #[test]
    fn test_inject_license_preserves_comments_and_cdata() {
        let content = r#"<project>
    <!-- generated by gradle -->
    <description><![CDATA[Optional <backport>]]></description>
</project>"#;
        let output = inject_license(content).unwrap();
        assert!(output.contains("<!-- generated by gradle -->"));
        assert!(output.contains("<![CDATA[Optional <backport>]]>"));
        let root = parse_document(&output).unwrap();
        assert_eq!(root.find("description").unwrap().text, "Optional <backport>");
    }

    #[rstest]
    #[case("<name>Retro &amp; Optional</name>")]
    #[case("<name>&#169; memoizr</name>")]
    #[case("<name>Retro &amp;</name>")]
    #[case("<name>Retro &amp; </name>")]
    #[case("<name>&amp;</name>")]
    #[case("<name> &quot;retro&quot; </name>")]
    #[case("<name>&lt;<![CDATA[x]]>&gt;</name>")]
    fn test_inject_license_keeps_text_runs_inline(#[case] element: &str) {
        let output = inject_license(&format!("<project>{element}</project>")).unwrap();
        assert!(
            output.contains(&format!("\n    {element}\n")),
            "text run changed: {output}"
        );
    }

    #[test]
    fn test_inject_license_writes_empty_elements_self_closing() {
        let content = "<project>\n  <dependencies></dependencies>\n  <name>\n  </name>\n</project>";
        let output = inject_license(content).unwrap();
        assert!(output.contains("\n  <dependencies/>\n  <name/>\n  <licenses>\n"));
        let root = parse_document(&output).unwrap();
        assert_eq!(root.find("dependencies").unwrap().text, "");
        assert_eq!(root.find("name").unwrap().text, "");
    }

    #[test]
    fn test_inject_license_is_deterministic() {
        assert_eq!(
            inject_license(MINIMAL).unwrap(),
            inject_license(MINIMAL).unwrap()
        );
    }

    #[test]
    fn test_inject_license_block_does_not_depend_on_input() {
        let a = parse_document(&inject_license("<a/>").unwrap()).unwrap();
        let b = parse_document(&inject_license(MINIMAL).unwrap()).unwrap();
        assert_eq!(a.find("licenses"), b.find("licenses"));
    }

    #[rstest]
    #[case("<project><unclosed>")]
    #[case("<project><groupId>x</artifactId></project>")]
    #[case("<project></project><project></project>")]
    #[case("<project/><other/>")]
    #[case("text before <project/>")]
    #[case("<project/> trailing")]
    #[case("")]
    #[case("   \n  ")]
    #[case("<!-- only a comment -->")]
    #[case("</project>")]
    #[case("<project")]
    #[case(" <?xml version=\"1.0\"?><project/>")]
    #[case("<project/><?xml version=\"1.0\"?>")]
    #[case("<project><?xml version=\"1.0\"?></project>")]
    #[case("<project a=\"1\" a=\"2\"/>")]
    #[case("<project><dependency scope=\"test\" scope=\"test\"></dependency></project>")]
    fn test_inject_license_malformed(#[case] content: &str) {
        let err = inject_license(content).unwrap_err();
        assert!(err.is_parse(), "expected parse error, got {err:?}");
        assert!(err.to_string().contains("XML parsing error"));
    }

    #[test]
    fn test_parse_document_resolves_character_references() {
        let root = parse_document("<p><v>&#65;&#x42;</v></p>").unwrap();
        assert_eq!(root.find("v").unwrap().text, "AB");
    }

    #[rstest]
    #[case("<a>&amp; &amp;</a>", "& &")]
    #[case("<a> &amp;</a>", " &")]
    #[case("<a>x &amp; </a>", "x & ")]
    #[case("<a>\n  <b/>\n</a>", "")]
    fn test_parse_document_keeps_blank_text_in_runs(#[case] content: &str, #[case] expected: &str) {
        assert_eq!(parse_document(content).unwrap().text, expected);
    }

    #[test]
    fn test_parse_document_rejects_duplicate_attribute() {
        assert!(parse_document("<a x=\"1\" x=\"2\"/>").unwrap_err().is_parse());
    }

    #[test]
    fn test_parse_document_rejects_late_declaration() {
        assert!(
            parse_document("<a/><?xml version=\"1.0\"?>")
                .unwrap_err()
                .is_parse()
        );
    }

    #[test]
    fn test_parse_document_rejects_unclosed() {
        assert!(parse_document("<project><unclosed>").unwrap_err().is_parse());
    }

    #[test]
    fn test_count_licenses_blocks_without_block() {
        assert_eq!(count_licenses_blocks(MINIMAL).unwrap(), 0);
    }

    #[rstest]
    #[case("<project>\n    <a/>\n</project>", (b' ', 4))]
    #[case("<project>\n  <a/>\n</project>", (b' ', 2))]
    #[case("<project>\n\t<a/>\n</project>", (b'\t', 1))]
    #[case("<project><a/></project>", (b' ', 4))]
    #[case("", (b' ', 4))]
    #[case("<project>\n\n   \n  <a/>\n</project>", (b' ', 2))]
    fn test_detect_indent(#[case] content: &str, #[case] expected: (u8, usize)) {
        assert_eq!(detect_indent(content), expected);
    }
}
