//! XES event-log import.
//!
//! Parses the subset of the XES schema the core cares about: `<trace>` elements containing a
//! `<string key="concept:name">` case id, and nested `<event>` elements whose `concept:name`
//! string gives the [`Event::task`][super::Event::task], whose `date`-typed attribute (if any)
//! gives the timestamp, whose `int`-typed attribute (if any) gives the cost, and any other
//! attribute value is appended to `resources`.
//!
//! Extensions, classifiers, global attributes and nested attribute trees are out of scope.

use std::io::{BufRead, Read};

use chrono::{DateTime, NaiveDateTime, Utc};
use quick_xml::events::BytesStart;
use quick_xml::Reader;

use super::{Event, Log};

#[derive(Clone, Copy, Debug, PartialEq)]
enum Mode {
    Trace,
    Event,
    None,
}

fn attr_value(t: &BytesStart) -> (Vec<u8>, String) {
    let mut key = Vec::new();
    let mut value = String::new();
    for a in t.attributes().flatten() {
        match a.key.as_ref() {
            b"key" => key = a.value.into_owned(),
            b"value" => {
                let _ = a.value.as_ref().read_to_string(&mut value);
            }
            _ => {}
        }
    }
    (key, value)
}

fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.into());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .and_then(|ndt| ndt.and_local_timezone(Utc).single())
}

/// Import a [`Log`] from a [`Reader`] over XES XML content.
pub fn import_xes<T: BufRead>(reader: &mut Reader<T>) -> Result<Log, quick_xml::Error> {
    reader.trim_text(true);
    let mut buf = Vec::new();
    let mut log = Log::new();
    let mut mode = Mode::None;
    let mut current_case: Option<String> = None;
    let mut current_event: Option<Event> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            quick_xml::events::Event::Start(t) | quick_xml::events::Event::Empty(t) => {
                match t.name().as_ref() {
                    b"trace" => {
                        mode = Mode::Trace;
                    }
                    b"event" => {
                        mode = Mode::Event;
                        current_event = Some(Event::new(String::new()));
                    }
                    tag_name => {
                        let (key, value) = attr_value(&t);
                        match mode {
                            Mode::Trace if key.as_slice() == b"concept:name" => {
                                let case = value.clone();
                                current_case = Some(case.clone());
                                log.entry(case).or_default();
                            }
                            Mode::Event => {
                                if let Some(event) = current_event.as_mut() {
                                    if key.as_slice() == b"concept:name" {
                                        event.task = value;
                                    } else if tag_name == b"date" {
                                        event.timestamp = parse_date(&value);
                                    } else if tag_name == b"int" {
                                        event.cost = value.parse::<f64>().ok();
                                    } else {
                                        event.resources.push(value);
                                    }
                                }
                            }
                            _ => {}
                        }
                    }
                }
            }
            quick_xml::events::Event::End(t) => match t.name().as_ref() {
                b"event" => {
                    if let (Some(case), Some(mut event)) =
                        (current_case.clone(), current_event.take())
                    {
                        event.case = Some(case.clone());
                        log.entry(case).or_default().push(event);
                    }
                    mode = Mode::Trace;
                }
                b"trace" => {
                    current_case = None;
                    mode = Mode::None;
                }
                _ => {}
            },
            quick_xml::events::Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(log)
}

/// Import a [`Log`] from an in-memory XES byte slice.
pub fn import_xes_slice(slice: &[u8]) -> Result<Log, quick_xml::Error> {
    let mut reader = Reader::from_reader(slice);
    import_xes(&mut reader)
}

/// Import a [`Log`] from an XES file at the given path.
pub fn import_xes_file<P: AsRef<std::path::Path>>(path: P) -> Result<Log, quick_xml::Error> {
    let mut reader: Reader<std::io::BufReader<std::fs::File>> = Reader::from_file(path)?;
    import_xes(&mut reader)
}
