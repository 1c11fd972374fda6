//! XML configuration documents.
//!
//! ```xml
//! <bbcode>
//!   <tags>
//!     <tag name="code" type="literal" parameter="false">
//!       <open><![CDATA[<pre>]]></open>
//!       <close><![CDATA[</pre>]]></close>
//!     </tag>
//!   </tags>
//!   <replacements>
//!     <replacement>
//!       <oldvalue>\r?\n</oldvalue>
//!       <newvalue><![CDATA[<br />]]></newvalue>
//!     </replacement>
//!   </replacements>
//!   <literalReplacements />
//! </bbcode>
//! ```

use std::collections::HashMap;
use std::io::BufRead;

use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, BytesStart, Event};
use quick_xml::reader::Reader;

use crate::ConfigError;
use crate::document::{ConfigDocument, Replacement, TagEntry, parse_kind};

/// Element tree node.
///
/// `text` holds character data before the first child; each child's `tail`
/// holds character data following it.
#[derive(Debug, Default)]
struct Element {
    name: String,
    attrs: HashMap<String, String>,
    text: String,
    tail: String,
    children: Vec<Element>,
}

impl Element {
    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.name == name)
    }

    fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Concatenated character data of this element and its descendants.
    fn inner_text(&self) -> String {
        let mut out = self.text.clone();
        for child in &self.children {
            out.push_str(&child.inner_text());
            out.push_str(&child.tail);
        }
        out
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    fn require_attr(&self, name: &str) -> Result<&str, ConfigError> {
        self.attr(name).ok_or_else(|| {
            ConfigError::Validation(format!(
                "<{}> is missing required attribute `{name}`",
                self.name
            ))
        })
    }

    fn require_child(&self, name: &str) -> Result<&Element, ConfigError> {
        self.child(name).ok_or_else(|| {
            ConfigError::Validation(format!(
                "<{}> is missing required element <{name}>",
                self.name
            ))
        })
    }
}

impl ConfigDocument {
    /// Parse an XML configuration document.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed XML, a root element other than
    /// `<bbcode>`, missing required attributes or elements, an invalid
    /// `parameter` boolean, or an unknown `type`.
    pub fn from_xml(xml: &str) -> Result<Self, ConfigError> {
        let root = parse_tree(xml)?;
        if root.name != "bbcode" {
            return Err(ConfigError::Validation(format!(
                "expected <bbcode> root element, found <{}>",
                root.name
            )));
        }

        let mut document = Self::default();

        for tag in root
            .children_named("tags")
            .flat_map(|tags| tags.children_named("tag"))
        {
            document.tags.push(parse_tag(tag)?);
        }

        document.replacements = parse_replacements(&root, "replacements")?;
        document.literal_replacements = parse_replacements(&root, "literalReplacements")?;

        Ok(document)
    }
}

fn parse_tag(tag: &Element) -> Result<TagEntry, ConfigError> {
    let name = tag.require_attr("name")?;
    let kind = parse_kind(name, tag.attr("type"))?;
    let parameterized = parse_bool(tag.require_attr("parameter")?)?;

    Ok(TagEntry {
        name: name.to_owned(),
        kind,
        parameterized,
        open: tag.child("open").map(Element::inner_text).unwrap_or_default(),
        close: tag.child("close").map(Element::inner_text).unwrap_or_default(),
    })
}

fn parse_replacements(root: &Element, section: &str) -> Result<Vec<Replacement>, ConfigError> {
    root.children_named(section)
        .flat_map(|s| s.children_named("replacement"))
        .map(|r| {
            Ok(Replacement {
                pattern: r.require_child("oldvalue")?.inner_text(),
                replacement: r.require_child("newvalue")?.inner_text(),
            })
        })
        .collect()
}

/// Parse `true` / `false`, ignoring case and surrounding whitespace.
fn parse_bool(value: &str) -> Result<bool, ConfigError> {
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ConfigError::Validation(format!(
            "`{value}` is not a valid boolean"
        )))
    }
}

/// Parse a document into an element tree rooted at its document element.
fn parse_tree(xml: &str) -> Result<Element, ConfigError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let mut root = start_element(&reader, &e);
                buf.clear();
                parse_children(&mut reader, &mut root)?;
                return Ok(root);
            }
            Event::Empty(e) => return Ok(start_element(&reader, &e)),
            Event::Eof => {
                return Err(ConfigError::Validation(
                    "document has no root element".to_owned(),
                ));
            }
            _ => {}
        }
        buf.clear();
    }
}

fn parse_children<R: BufRead>(
    reader: &mut Reader<R>,
    node: &mut Element,
) -> Result<(), ConfigError> {
    let mut buf = Vec::new();
    let mut run = TextRun::default();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                run.flush_into(node);
                let mut child = start_element(reader, &e);
                parse_children(reader, &mut child)?;
                node.children.push(child);
            }
            Event::Empty(e) => {
                run.flush_into(node);
                let child = start_element(reader, &e);
                node.children.push(child);
            }
            Event::Text(e) => run.push_text(&e.decode()?),
            Event::GeneralRef(e) => run.push_content(&resolve_reference(&e)?),
            Event::CData(e) => {
                // A CDATA section is a node of its own
                run.flush_into(node);
                append_text(node, &e.decode()?);
            }
            Event::End(_) => {
                run.flush_into(node);
                return Ok(());
            }
            Event::Eof => {
                return Err(ConfigError::Validation(format!(
                    "unexpected end of document inside <{}>",
                    node.name
                )));
            }
            _ => {}
        }
        buf.clear();
    }
}

/// Character data and references read since the last markup boundary.
///
/// quick-xml splits one text node at every reference, so pieces are
/// collected here and only judged once the node is complete.
#[derive(Debug, Default)]
struct TextRun {
    text: String,
    significant: bool,
}

impl TextRun {
    fn push_text(&mut self, text: &str) {
        self.significant |= !text.trim().is_empty();
        self.text.push_str(text);
    }

    fn push_content(&mut self, text: &str) {
        self.significant = true;
        self.text.push_str(text);
    }

    /// Move the run into `node`. A whitespace-only run is indentation and
    /// is dropped.
    fn flush_into(&mut self, node: &mut Element) {
        let text = std::mem::take(&mut self.text);
        if std::mem::take(&mut self.significant) {
            append_text(node, &text);
        }
    }
}

fn start_element<R: BufRead>(reader: &Reader<R>, e: &BytesStart) -> Element {
    let name = reader.decoder().decode(e.name().as_ref()).map_or_else(
        |_| String::from_utf8_lossy(e.name().as_ref()).into_owned(),
        std::borrow::Cow::into_owned,
    );

    let mut attrs = HashMap::new();
    for attr in e.attributes().flatten() {
        let key = reader.decoder().decode(attr.key.as_ref()).map_or_else(
            |_| String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
            std::borrow::Cow::into_owned,
        );
        let value = attr.unescape_value().map_or_else(
            |_| String::from_utf8_lossy(&attr.value).into_owned(),
            std::borrow::Cow::into_owned,
        );
        attrs.insert(key, value);
    }

    Element {
        name,
        attrs,
        ..Default::default()
    }
}

/// Append text to node's text or last child's tail.
fn append_text(node: &mut Element, text: &str) {
    if let Some(last_child) = node.children.last_mut() {
        last_child.tail.push_str(text);
    } else {
        node.text.push_str(text);
    }
}

/// Resolve a character or predefined entity reference. Anything else is
/// kept verbatim.
fn resolve_reference(reference: &BytesRef) -> Result<String, ConfigError> {
    if let Some(ch) = reference.resolve_char_ref()? {
        return Ok(ch.to_string());
    }
    let name = reference.decode()?;
    Ok(resolve_predefined_entity(&name).map_or_else(|| format!("&{name};"), str::to_owned))
}

#[cfg(test)]
mod tests {
    use bbcode_core::{ConfigurationError, TagKind};
    use pretty_assertions::assert_eq;

    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0"?>
<bbcode>
  <tags>
    <tag name="A" type="newcontext" parameter="false">
      <open><![CDATA[A]]></open>
      <close><![CDATA[a]]></close>
    </tag>
    <tag name="code" type="Literal" parameter=" True ">
      <open><![CDATA[<pre title="{0}">]]></open>
      <close>&lt;/pre&gt;</close>
    </tag>
    <tag name="hr" parameter="false" />
  </tags>
  <replacements>
    <replacement>
      <oldvalue>\n</oldvalue>
      <newvalue><![CDATA[<br />]]></newvalue>
    </replacement>
  </replacements>
  <literalReplacements>
    <replacement>
      <oldvalue>\t</oldvalue>
      <newvalue><![CDATA[  ]]></newvalue>
    </replacement>
  </literalReplacements>
</bbcode>"#;

    #[test]
    fn test_parse_sample() {
        let document = ConfigDocument::from_xml(SAMPLE).unwrap();

        assert_eq!(
            document.tags,
            vec![
                TagEntry {
                    name: "A".to_owned(),
                    kind: TagKind::NewContext,
                    parameterized: false,
                    open: "A".to_owned(),
                    close: "a".to_owned(),
                },
                TagEntry {
                    name: "code".to_owned(),
                    kind: TagKind::Literal,
                    parameterized: true,
                    open: "<pre title=\"{0}\">".to_owned(),
                    close: "</pre>".to_owned(),
                },
                TagEntry {
                    name: "hr".to_owned(),
                    kind: TagKind::Normal,
                    parameterized: false,
                    open: String::new(),
                    close: String::new(),
                },
            ]
        );
        assert_eq!(
            document.replacements,
            vec![Replacement {
                pattern: r"\n".to_owned(),
                replacement: "<br />".to_owned(),
            }]
        );
        assert_eq!(document.literal_replacements[0].replacement, "  ");
    }

    #[test]
    fn test_interpret_from_xml() {
        let xml = r#"<bbcode>
  <tags>
    <tag name="A" type="normal" parameter="false">
      <open><![CDATA[A]]></open>
      <close><![CDATA[a]]></close>
    </tag>
    <tag name="B" type="normal" parameter="false">
      <open><![CDATA[B]]></open>
      <close><![CDATA[b]]></close>
    </tag>
  </tags>
</bbcode>"#;
        let interpreter = ConfigDocument::from_xml(xml).unwrap().build().unwrap();
        assert_eq!(interpreter.interpret("[A][B]c[/A][/B]"), "ABcbaBb");
    }

    #[test]
    fn test_missing_name() {
        let xml = r#"<bbcode><tags><tag parameter="false" /></tags></bbcode>"#;
        let err = ConfigDocument::from_xml(xml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref m) if m.contains("`name`")));
    }

    #[test]
    fn test_missing_parameter() {
        let xml = r#"<bbcode><tags><tag name="b" /></tags></bbcode>"#;
        let err = ConfigDocument::from_xml(xml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref m) if m.contains("`parameter`")));
    }

    #[test]
    fn test_invalid_parameter_boolean() {
        let xml = r#"<bbcode><tags><tag name="b" parameter="yes" /></tags></bbcode>"#;
        assert!(matches!(
            ConfigDocument::from_xml(xml),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_unknown_type() {
        let xml = r#"<bbcode><tags><tag name="b" type="bold" parameter="false" /></tags></bbcode>"#;
        assert!(matches!(
            ConfigDocument::from_xml(xml),
            Err(ConfigError::Definition(ConfigurationError::UnknownKind(_)))
        ));
    }

    #[test]
    fn test_missing_newvalue() {
        let xml = r"<bbcode><replacements><replacement><oldvalue>x</oldvalue></replacement></replacements></bbcode>";
        let err = ConfigDocument::from_xml(xml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref m) if m.contains("<newvalue>")));
    }

    #[test]
    fn test_wrong_root() {
        let err = ConfigDocument::from_xml("<tags />").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref m) if m.contains("<bbcode>")));
    }

    #[test]
    fn test_malformed_xml() {
        assert!(matches!(
            ConfigDocument::from_xml("<bbcode><tags></bbcode>"),
            Err(ConfigError::Xml(_))
        ));
    }

    #[test]
    fn test_truncated_document() {
        assert!(ConfigDocument::from_xml("<bbcode><tags>").is_err());
    }

    #[test]
    fn test_empty_document() {
        assert!(ConfigDocument::from_xml("").is_err());
    }

    fn open_template(open: &str) -> String {
        let xml = format!(r#"<bbcode><tags><tag name="t" parameter="false"><open>{open}</open></tag></tags></bbcode>"#);
        ConfigDocument::from_xml(&xml).unwrap().tags.remove(0).open
    }

    #[test]
    fn test_references() {
        assert_eq!(open_template("&#65;&#x42;&lt;&nbsp;"), "AB<&nbsp;");
    }

    #[test]
    fn test_whitespace_between_references_is_kept() {
        assert_eq!(open_template("&lt;b&gt; &lt;i&gt;"), "<b> <i>");
        assert_eq!(open_template(" &amp; "), " & ");
    }

    #[test]
    fn test_whitespace_around_cdata_is_dropped() {
        assert_eq!(open_template("\n  <![CDATA[<b> ]]>\n"), "<b> ");
        assert_eq!(open_template("   "), "");
    }

    #[test]
    fn test_text_around_cdata_is_kept() {
        assert_eq!(open_template("a <![CDATA[<b>]]> c"), "a <b> c");
    }
}
