//! Literal triples from RDF/XML
//!
//! A streaming reader for the striped RDF/XML syntax served by UniProt.
//! Node elements carry the subject (`rdf:about`, `rdf:ID` or `rdf:nodeID`);
//! their child property elements carry predicates. Only triples whose
//! object is a plain literal are reported, either from property element
//! text or from property attributes on a node element.

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use std::collections::HashSet;

const RDF_NS: &[u8] = b"http://www.w3.org/1999/02/22-rdf-syntax-ns#";
const XML_NS: &[u8] = b"http://www.w3.org/XML/1998/namespace";

/// `subject predicate "value"`; the predicate is the element's local name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LiteralTriple {
    pub subject: String,
    pub predicate: String,
    pub value: String,
}

impl LiteralTriple {
    /// Last `/`-separated segment of the subject IRI
    pub fn subject_tail(&self) -> &str {
        self.subject.rsplit('/').next().unwrap_or(&self.subject)
    }
}

enum Frame {
    Root,
    Node {
        subject: Option<String>,
        implicit: bool,
    },
    Property {
        subject: Option<String>,
        predicate: String,
        text: String,
        literal: bool,
    },
}

enum Parent {
    Document,
    Root,
    Node(Option<String>),
    Property,
}

fn in_namespace(resolved: &ResolveResult<'_>, namespace: &[u8]) -> bool {
    matches!(resolved, ResolveResult::Bound(Namespace(ns)) if *ns == namespace)
}

/// Collect literal triples whose predicate local name satisfies `matches`.
///
/// Identical triples are reported once, in document order.
pub fn literal_triples<F>(content: &str, matches: F) -> quick_xml::Result<Vec<LiteralTriple>>
where
    F: Fn(&str) -> bool,
{
    let mut reader = NsReader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut collector = Collector {
        stack: Vec::new(),
        triples: Vec::new(),
        seen: HashSet::new(),
        matches,
    };

    loop {
        match reader.read_event()? {
            Event::Start(e) => collector.open(&reader, &e)?,
            Event::Empty(e) => {
                collector.open(&reader, &e)?;
                collector.close();
            },
            Event::End(_) => collector.close(),
            Event::Text(t) => collector.push_text(&t.unescape()?),
            Event::CData(c) => collector.push_text(&String::from_utf8_lossy(&c)),
            Event::Eof => break,
            _ => {},
        }
    }

    Ok(collector.triples)
}

struct Collector<F> {
    stack: Vec<Frame>,
    triples: Vec<LiteralTriple>,
    seen: HashSet<LiteralTriple>,
    matches: F,
}

impl<F: Fn(&str) -> bool> Collector<F> {
    fn emit(&mut self, subject: &str, predicate: &str, value: String) {
        if !(self.matches)(predicate) {
            return;
        }
        let triple = LiteralTriple {
            subject: subject.to_string(),
            predicate: predicate.to_string(),
            value,
        };
        if self.seen.insert(triple.clone()) {
            self.triples.push(triple);
        }
    }

    fn open(&mut self, reader: &NsReader<&[u8]>, element: &BytesStart<'_>) -> quick_xml::Result<()> {
        let (resolved, local) = reader.resolve_element(element.name());
        let is_rdf = in_namespace(&resolved, RDF_NS);
        let local = String::from_utf8_lossy(local.as_ref()).into_owned();

        let parent = match self.stack.last() {
            None => Parent::Document,
            Some(Frame::Root) => Parent::Root,
            Some(Frame::Node { subject, .. }) => Parent::Node(subject.clone()),
            Some(Frame::Property { .. }) => Parent::Property,
        };

        match parent {
            Parent::Document if is_rdf && local == "RDF" => self.stack.push(Frame::Root),
            Parent::Document | Parent::Root => self.open_node(reader, element)?,
            Parent::Property => {
                if let Some(Frame::Property { literal, .. }) = self.stack.last_mut() {
                    *literal = false;
                }
                self.open_node(reader, element)?;
            },
            Parent::Node(subject) => self.open_property(reader, element, subject, local)?,
        }

        Ok(())
    }

    fn open_node(&mut self, reader: &NsReader<&[u8]>, element: &BytesStart<'_>) -> quick_xml::Result<()> {
        let mut subject = None;
        let mut properties = Vec::new();

        for attr in element.attributes() {
            let attr = attr?;
            if attr.key.as_namespace_binding().is_some() {
                continue;
            }
            let (resolved, local) = reader.resolve_attribute(attr.key);
            let value = attr.unescape_value()?.into_owned();

            if in_namespace(&resolved, RDF_NS) {
                match local.as_ref() {
                    b"about" => subject = Some(value),
                    b"ID" => subject = Some(format!("#{}", value)),
                    b"nodeID" => subject = Some(format!("_:{}", value)),
                    _ => {},
                }
            } else if !in_namespace(&resolved, XML_NS) {
                properties.push((String::from_utf8_lossy(local.as_ref()).into_owned(), value));
            }
        }

        if let Some(subject) = &subject {
            for (predicate, value) in properties {
                self.emit(subject, &predicate, value);
            }
        }

        self.stack.push(Frame::Node {
            subject,
            implicit: false,
        });
        Ok(())
    }

    fn open_property(
        &mut self,
        reader: &NsReader<&[u8]>,
        element: &BytesStart<'_>,
        subject: Option<String>,
        predicate: String,
    ) -> quick_xml::Result<()> {
        let mut literal = true;
        let mut nested_resource = false;

        for attr in element.attributes() {
            let attr = attr?;
            if attr.key.as_namespace_binding().is_some() {
                continue;
            }
            let (resolved, local) = reader.resolve_attribute(attr.key);

            if in_namespace(&resolved, RDF_NS) {
                match local.as_ref() {
                    b"resource" | b"nodeID" => literal = false,
                    b"parseType" => {
                        literal = false;
                        nested_resource = attr.unescape_value()? == "Resource";
                    },
                    _ => {},
                }
            } else if !in_namespace(&resolved, XML_NS) {
                // Property attributes describe a blank node object
                literal = false;
            }
        }

        self.stack.push(Frame::Property {
            subject,
            predicate,
            text: String::new(),
            literal,
        });
        if nested_resource {
            self.stack.push(Frame::Node {
                subject: None,
                implicit: true,
            });
        }
        Ok(())
    }

    fn push_text(&mut self, chunk: &str) {
        if let Some(Frame::Property { text, .. }) = self.stack.last_mut() {
            text.push_str(chunk);
        }
    }

    fn close(&mut self) {
        let mut frame = self.stack.pop();
        if let Some(Frame::Node { implicit: true, .. }) = frame {
            frame = self.stack.pop();
        }

        if let Some(Frame::Property {
            subject: Some(subject),
            predicate,
            text,
            literal: true,
        }) = frame
        {
            self.emit(&subject, &predicate, text);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const UNIPROT_ENTRY: &str = r#"<?xml version='1.0' encoding='UTF-8'?>
<rdf:RDF xmlns="http://purl.uniprot.org/core/"
         xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#">
  <rdf:Description rdf:about="http://purl.uniprot.org/uniprot/P0A6A8">
    <rdf:type rdf:resource="http://purl.uniprot.org/core/Protein"/>
    <reviewed rdf:datatype="http://www.w3.org/2001/XMLSchema#boolean">true</reviewed>
    <mnemonic>ACP_ECOLI</mnemonic>
    <oldMnemonic>ACP_ECO57</oldMnemonic>
    <organism rdf:resource="http://purl.uniprot.org/taxonomy/83333"/>
    <recommendedName>
      <Structured_Name>
        <fullName>Acyl carrier protein</fullName>
      </Structured_Name>
    </recommendedName>
    <annotation rdf:parseType="Resource">
      <rdfs:comment>Carrier of the growing fatty acid chain</rdfs:comment>
    </annotation>
  </rdf:Description>
</rdf:RDF>"#;

    fn mnemonic(predicate: &str) -> bool {
        predicate.contains("mnemonic") || predicate.contains("Mnemonic")
    }

    #[test]
    fn test_mnemonic_triples() {
        let triples = literal_triples(UNIPROT_ENTRY, |p| p.contains("mnemonic")).unwrap();
        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].subject, "http://purl.uniprot.org/uniprot/P0A6A8");
        assert_eq!(triples[0].subject_tail(), "P0A6A8");
        assert_eq!(triples[0].value, "ACP_ECOLI");

        let triples = literal_triples(UNIPROT_ENTRY, mnemonic).unwrap();
        let values: Vec<_> = triples.iter().map(|t| t.value.as_str()).collect();
        assert_eq!(values, vec!["ACP_ECOLI", "ACP_ECO57"]);
    }

    #[test]
    fn test_nested_nodes_and_resources() {
        let triples = literal_triples(UNIPROT_ENTRY, |_| true).unwrap();
        let predicates: Vec<_> = triples.iter().map(|t| t.predicate.as_str()).collect();

        // recommendedName has a node object, organism a resource; the
        // blank-node subjects carry no IRI and are not reported
        assert!(predicates.contains(&"reviewed"));
        assert!(!predicates.contains(&"recommendedName"));
        assert!(!predicates.contains(&"organism"));
        assert!(!predicates.contains(&"annotation"));
        assert!(!predicates.contains(&"fullName"));
    }

    #[test]
    fn test_property_attributes_and_typed_nodes() {
        let xml = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
                             xmlns:up="http://purl.uniprot.org/core/">
            <up:Protein rdf:about="http://purl.uniprot.org/uniprot/Q9XYZ1" up:mnemonic="Q9XYZ1_9BACT"/>
            <up:Protein rdf:about="http://purl.uniprot.org/uniprot/Q9XYZ1" up:mnemonic="Q9XYZ1_9BACT"/>
        </rdf:RDF>"#;

        let triples = literal_triples(xml, |p| p.contains("mnemonic")).unwrap();
        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].subject_tail(), "Q9XYZ1");
        assert_eq!(triples[0].value, "Q9XYZ1_9BACT");
    }

    #[test]
    fn test_malformed_document() {
        let xml = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
            <rdf:Description rdf:about="x"><mnemonic>A</wrong></rdf:Description>
        </rdf:RDF>"#;
        assert!(literal_triples(xml, |_| true).is_err());
    }
}
