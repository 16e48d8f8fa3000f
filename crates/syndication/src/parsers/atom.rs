use chrono::{DateTime, Utc};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::models::FeedEntry;
use crate::FeedError;

/// Parse an Atom 1.0 feed from raw XML bytes
pub fn parse_atom_feed(xml: &[u8]) -> Result<Vec<FeedEntry>, FeedError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut buf = Vec::new();

    let mut current_entry: Option<AtomEntryBuilder> = None;
    let mut current_element = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                current_element = name.clone();

                if name == "entry" {
                    current_entry = Some(AtomEntryBuilder::default());
                }

                if let Some(ref mut entry) = current_entry {
                    read_attributes(&name, &e, entry);
                }
            }
            Ok(Event::Empty(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();

                if let Some(ref mut entry) = current_entry {
                    read_attributes(&name, &e, entry);
                }
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();

                if name == "entry" {
                    if let Some(builder) = current_entry.take() {
                        if let Some(entry) = builder.build() {
                            entries.push(entry);
                        }
                    }
                }
                current_element.clear();
            }
            Ok(Event::Text(e)) => {
                if let Some(ref mut entry) = current_entry {
                    let text = e.unescape().unwrap_or_default().to_string();
                    set_field(entry, &current_element, text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(ref mut entry) = current_entry {
                    let text = String::from_utf8_lossy(&e.into_inner()).to_string();
                    set_field(entry, &current_element, text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(FeedError::Parse(format!("XML parse error: {}", e))),
            _ => {}
        }
        buf.clear();
    }

    Ok(entries)
}

/// Handle attribute-carrying elements inside an <entry>:
/// <link href=".." rel=".."/> and Media RSS <media:content url=".."/>
fn read_attributes(name: &str, e: &BytesStart, entry: &mut AtomEntryBuilder) {
    match name {
        "link" => {
            let mut href = None;
            let mut rel = None;
            for attr in e.attributes().flatten() {
                let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
                let value = String::from_utf8_lossy(&attr.value).to_string();
                match key.as_str() {
                    "href" => href = Some(value),
                    "rel" => rel = Some(value),
                    _ => {}
                }
            }
            // The permalink is the alternate link; a link without rel
            // defaults to alternate per the Atom spec
            let is_alternate = matches!(rel.as_deref(), None | Some("alternate"));
            if is_alternate {
                if let Some(href) = href {
                    entry.link = Some(href);
                }
            }
        }
        "media:content" => {
            for attr in e.attributes().flatten() {
                let key = String::from_utf8_lossy(attr.key.as_ref());
                let value = String::from_utf8_lossy(&attr.value);
                if key.as_ref() == "url" {
                    entry.image_url = Some(value.to_string());
                }
            }
        }
        _ => {}
    }
}

fn set_field(entry: &mut AtomEntryBuilder, element: &str, text: String) {
    if text.is_empty() {
        return;
    }
    match element {
        "title" => entry.title = Some(text),
        "summary" => entry.summary = Some(text),
        "published" => entry.published = parse_rfc3339(&text),
        "updated" => entry.updated = parse_rfc3339(&text),
        _ => {}
    }
}

#[derive(Default)]
struct AtomEntryBuilder {
    title: Option<String>,
    link: Option<String>,
    summary: Option<String>,
    image_url: Option<String>,
    published: Option<DateTime<Utc>>,
    updated: Option<DateTime<Utc>>,
}

impl AtomEntryBuilder {
    fn build(self) -> Option<FeedEntry> {
        Some(FeedEntry {
            title: self.title?,
            link: self.link,
            description: self.summary,
            image_url: self.image_url,
            published_at: self.published.or(self.updated),
        })
    }
}

/// Parse an RFC 3339 timestamp as used by Atom published/updated
fn parse_rfc3339(date_str: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(date_str)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_ATOM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom" xmlns:media="http://search.yahoo.com/mrss/">
  <title>Example Atom</title>
  <updated>2024-12-25T00:00:00Z</updated>
  <entry>
    <title>Atom entry one</title>
    <link rel="self" href="https://example.com/feed/1"/>
    <link rel="alternate" href="https://example.com/posts/1"/>
    <summary>Short summary</summary>
    <published>2024-12-23T10:00:00Z</published>
    <updated>2024-12-24T10:00:00Z</updated>
    <media:content url="https://example.com/images/atom-1.png"/>
  </entry>
  <entry>
    <title>Atom entry two</title>
    <link href="https://example.com/posts/2"/>
    <updated>2024-12-25T09:30:00+01:00</updated>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_atom_feed() {
        let entries = parse_atom_feed(SAMPLE_ATOM.as_bytes()).unwrap();
        assert_eq!(entries.len(), 2);

        let first = &entries[0];
        assert_eq!(first.title, "Atom entry one");
        // rel="self" must not shadow the alternate link
        assert_eq!(first.link.as_deref(), Some("https://example.com/posts/1"));
        assert_eq!(first.description.as_deref(), Some("Short summary"));
        assert_eq!(
            first.image_url.as_deref(),
            Some("https://example.com/images/atom-1.png")
        );
        // published preferred over updated
        assert_eq!(
            first.published_at.unwrap().to_rfc3339(),
            "2024-12-23T10:00:00+00:00"
        );
    }

    #[test]
    fn test_updated_fallback() {
        let entries = parse_atom_feed(SAMPLE_ATOM.as_bytes()).unwrap();
        let second = &entries[1];
        assert_eq!(second.link.as_deref(), Some("https://example.com/posts/2"));
        assert_eq!(
            second.published_at.unwrap().to_rfc3339(),
            "2024-12-25T08:30:00+00:00"
        );
    }

    #[test]
    fn test_entry_without_link_is_kept() {
        let xml = r#"<feed><entry><title>no link</title></entry></feed>"#;
        let entries = parse_atom_feed(xml.as_bytes()).unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].link.is_none());
    }
}
