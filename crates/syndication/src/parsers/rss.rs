use chrono::{DateTime, Utc};
use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::models::FeedEntry;
use crate::FeedError;

/// Parse an RSS 2.0 feed from raw XML bytes
pub fn parse_rss_feed(xml: &[u8]) -> Result<Vec<FeedEntry>, FeedError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut buf = Vec::new();

    let mut current_entry: Option<FeedEntryBuilder> = None;
    let mut current_element = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                current_element = name.clone();

                if name == "item" {
                    current_entry = Some(FeedEntryBuilder::default());
                }

                // Handle <media:content> attributes
                if name == "media:content" {
                    if let Some(ref mut entry) = current_entry {
                        read_media_url(&e, entry);
                    }
                }
            }
            Ok(Event::Empty(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();

                // Handle self-closing <media:content ... />
                if name == "media:content" {
                    if let Some(ref mut entry) = current_entry {
                        read_media_url(&e, entry);
                    }
                }
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();

                if name == "item" {
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

/// Capture the url attribute of a <media:content> element.
/// When an item carries several media contents, the last one wins.
fn read_media_url(e: &quick_xml::events::BytesStart, entry: &mut FeedEntryBuilder) {
    for attr in e.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref());
        let value = String::from_utf8_lossy(&attr.value);
        if key.as_ref() == "url" {
            entry.image_url = Some(value.to_string());
        }
    }
}

fn set_field(entry: &mut FeedEntryBuilder, element: &str, text: String) {
    if text.is_empty() {
        return;
    }
    match element {
        "title" => entry.title = Some(text),
        "link" => entry.link = Some(text),
        "description" => entry.description = Some(text),
        "pubDate" => entry.published_at = parse_rfc2822(&text),
        // RSS 1.0 / RDF feeds date their items with Dublin Core
        "dc:date" => entry.published_at = parse_rfc3339(&text),
        _ => {}
    }
}

#[derive(Default)]
struct FeedEntryBuilder {
    title: Option<String>,
    link: Option<String>,
    description: Option<String>,
    image_url: Option<String>,
    published_at: Option<DateTime<Utc>>,
}

impl FeedEntryBuilder {
    fn build(self) -> Option<FeedEntry> {
        Some(FeedEntry {
            title: self.title?,
            link: self.link,
            description: self.description,
            image_url: self.image_url,
            published_at: self.published_at,
        })
    }
}

/// Parse an RFC 2822 date as used by RSS pubDate
/// Example: "Mon, 23 Dec 2024 12:30:00 +0800"
fn parse_rfc2822(date_str: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(date_str)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse an RFC 3339 date as used by dc:date
fn parse_rfc3339(date_str: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(date_str)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/">
  <channel>
    <title>Example News</title>
    <link>https://example.com</link>
    <item>
      <title>First article</title>
      <link>https://example.com/articles/1</link>
      <description><![CDATA[Plain <b>text</b> summary]]></description>
      <pubDate>Mon, 23 Dec 2024 12:30:00 +0800</pubDate>
      <media:content url="https://example.com/images/1-small.jpg" width="100"/>
      <media:content url="https://example.com/images/1.jpg" width="800"/>
    </item>
    <item>
      <title>Second article</title>
      <link>https://example.com/articles/2</link>
      <pubDate>Tue, 24 Dec 2024 08:00:00 GMT</pubDate>
    </item>
    <item>
      <title>No link</title>
      <pubDate>Tue, 24 Dec 2024 09:00:00 GMT</pubDate>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_parse_rss_feed() {
        let entries = parse_rss_feed(SAMPLE_RSS.as_bytes()).unwrap();
        assert_eq!(entries.len(), 3);

        let first = &entries[0];
        assert_eq!(first.title, "First article");
        assert_eq!(first.link.as_deref(), Some("https://example.com/articles/1"));
        assert_eq!(first.description.as_deref(), Some("Plain <b>text</b> summary"));
        // Last media:content wins
        assert_eq!(
            first.image_url.as_deref(),
            Some("https://example.com/images/1.jpg")
        );
        let published = first.published_at.unwrap();
        assert_eq!(published.to_rfc3339(), "2024-12-23T04:30:00+00:00");

        let second = &entries[1];
        assert!(second.description.is_none());
        assert!(second.image_url.is_none());
        assert!(second.published_at.is_some());
    }

    #[test]
    fn test_entry_without_link_is_kept() {
        let entries = parse_rss_feed(SAMPLE_RSS.as_bytes()).unwrap();
        let third = &entries[2];
        assert_eq!(third.title, "No link");
        assert!(third.link.is_none());
        assert!(third.published_at.is_some());
    }

    #[test]
    fn test_parse_rdf_feed_with_dc_date() {
        let xml = r#"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:dc="http://purl.org/dc/elements/1.1/"
         xmlns="http://purl.org/rss/1.0/">
  <channel rdf:about="https://example.com">
    <title>RDF channel</title>
  </channel>
  <item rdf:about="https://example.com/articles/9">
    <title>RDF article</title>
    <link>https://example.com/articles/9</link>
    <dc:date>2024-12-23T10:00:00Z</dc:date>
  </item>
</rdf:RDF>"#;
        let entries = parse_rss_feed(xml.as_bytes()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].published_at.unwrap().to_rfc3339(),
            "2024-12-23T10:00:00+00:00"
        );
    }

    #[test]
    fn test_channel_fields_do_not_leak_into_items() {
        let entries = parse_rss_feed(SAMPLE_RSS.as_bytes()).unwrap();
        assert!(entries.iter().all(|e| e.title != "Example News"));
    }

    #[test]
    fn test_unparseable_pub_date_is_none() {
        let xml = r#"<rss><channel><item>
            <title>t</title>
            <link>https://example.com/x</link>
            <pubDate>not a date</pubDate>
        </item></channel></rss>"#;
        let entries = parse_rss_feed(xml.as_bytes()).unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].published_at.is_none());
    }
}
