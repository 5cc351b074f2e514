//! Cypher text rendering for `RemoteClient`
//!
//! The server API takes a bare query string with no parameter map, so every
//! value is rendered as an escaped literal.

use crate::graph::{EdgeType, Label, NodeId, PropertyMap, PropertyValue};

/// Render a value as a Cypher literal
pub fn literal(value: &PropertyValue) -> String {
    match value {
        PropertyValue::String(s) => string_literal(s),
        PropertyValue::Integer(i) => i.to_string(),
        PropertyValue::Float(f) if f.is_finite() => {
            // Debug keeps the fractional part (`90.0`), so the server stores a float
            format!("{:?}", f)
        }
        PropertyValue::Float(_) => "null".to_string(),
        PropertyValue::Boolean(b) => b.to_string(),
        PropertyValue::Array(items) => {
            let parts: Vec<String> = items.iter().map(literal).collect();
            format!("[{}]", parts.join(", "))
        }
        PropertyValue::Null => "null".to_string(),
    }
}

/// Double-quoted string literal with backslash escapes
pub fn string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

/// Label, relationship type or property key. Anything other than a plain
/// word is backtick-quoted.
pub fn identifier(name: &str) -> String {
    let plain = !name.is_empty()
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit());
    if plain {
        name.to_string()
    } else {
        format!("`{}`", name.replace('`', "``"))
    }
}

/// `{key: literal, ...}` with keys sorted so output is stable
pub fn property_map(properties: &PropertyMap) -> String {
    let mut keys: Vec<&String> = properties.keys().collect();
    keys.sort();
    let parts: Vec<String> = keys
        .into_iter()
        .map(|k| format!("{}: {}", identifier(k), literal(&properties[k])))
        .collect();
    format!("{{{}}}", parts.join(", "))
}

pub fn find_node(label: &Label, key: &str, value: &PropertyValue) -> String {
    format!(
        "MATCH (n:{}) WHERE n.{} = {} RETURN n ORDER BY id(n) LIMIT 1",
        identifier(label.as_str()),
        identifier(key),
        literal(value)
    )
}

pub fn find_node_with_member(label: &Label, key: &str, member: &PropertyValue) -> String {
    format!(
        "MATCH (n:{}) WHERE {} IN n.{} RETURN n ORDER BY id(n) LIMIT 1",
        identifier(label.as_str()),
        literal(member),
        identifier(key)
    )
}

pub fn create_node(label: &Label, properties: &PropertyMap) -> String {
    format!(
        "CREATE (n:{} {}) RETURN n",
        identifier(label.as_str()),
        property_map(properties)
    )
}

/// Overwrites the listed properties; keys absent from `properties` are kept
pub fn set_node_properties(id: NodeId, properties: &PropertyMap) -> String {
    let mut keys: Vec<&String> = properties.keys().collect();
    keys.sort();
    let assignments: Vec<String> = keys
        .into_iter()
        .map(|k| format!("n.{} = {}", identifier(k), literal(&properties[k])))
        .collect();
    format!(
        "MATCH (n) WHERE id(n) = {} SET {} RETURN n",
        id.as_u64(),
        assignments.join(", ")
    )
}

pub fn edge_exists(source: NodeId, target: NodeId, edge_type: &EdgeType) -> String {
    format!(
        "MATCH (a)-[r:{}]->(b) WHERE id(a) = {} AND id(b) = {} RETURN r LIMIT 1",
        identifier(edge_type.as_str()),
        source.as_u64(),
        target.as_u64()
    )
}

pub fn create_edge(
    source: NodeId,
    target: NodeId,
    edge_type: &EdgeType,
    properties: &PropertyMap,
) -> String {
    format!(
        "MATCH (a), (b) WHERE id(a) = {} AND id(b) = {} CREATE (a)-[r:{} {}]->(b) RETURN r",
        source.as_u64(),
        target.as_u64(),
        identifier(edge_type.as_str()),
        property_map(properties)
    )
}

pub fn delete_all() -> String {
    "MATCH (n) DETACH DELETE n".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_escaping() {
        assert_eq!(string_literal("King's Cross"), "\"King's Cross\"");
        assert_eq!(string_literal("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(string_literal("a\\b\nc"), "\"a\\\\b\\nc\"");
    }

    #[test]
    fn test_literals() {
        assert_eq!(literal(&90.0.into()), "90.0");
        assert_eq!(literal(&0.3.into()), "0.3");
        assert_eq!(literal(&PropertyValue::Float(f64::NAN)), "null");
        assert_eq!(literal(&1906i64.into()), "1906");
        assert_eq!(literal(&true.into()), "true");
        assert_eq!(
            literal(&vec!["Piccadilly".to_string(), "Central".to_string()].into()),
            "[\"Piccadilly\", \"Central\"]"
        );
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(identifier("piccadilly"), "piccadilly");
        assert_eq!(identifier("hammersmith & city"), "`hammersmith & city`");
        assert_eq!(identifier("9line"), "`9line`");
        assert_eq!(identifier("a`b"), "`a``b`");
    }

    #[test]
    fn test_property_map_is_sorted() {
        let mut props = PropertyMap::new();
        props.insert("station_name".to_string(), "Holborn".into());
        props.insert("end_of_line".to_string(), false.into());
        assert_eq!(
            property_map(&props),
            "{end_of_line: false, station_name: \"Holborn\"}"
        );
    }

    #[test]
    fn test_query_shapes() {
        let station = Label::new("Station");
        assert_eq!(
            find_node_with_member(&station, "tube_line_identifiers", &"LS-A".into()),
            "MATCH (n:Station) WHERE \"LS-A\" IN n.tube_line_identifiers RETURN n ORDER BY id(n) LIMIT 1"
        );
        assert_eq!(
            edge_exists(NodeId::new(1), NodeId::new(2), &EdgeType::new("piccadilly")),
            "MATCH (a)-[r:piccadilly]->(b) WHERE id(a) = 1 AND id(b) = 2 RETURN r LIMIT 1"
        );

        let mut props = PropertyMap::new();
        props.insert("distance_km".to_string(), 0.3.into());
        assert_eq!(
            create_edge(NodeId::new(1), NodeId::new(2), &EdgeType::new("piccadilly"), &props),
            "MATCH (a), (b) WHERE id(a) = 1 AND id(b) = 2 CREATE (a)-[r:piccadilly {distance_km: 0.3}]->(b) RETURN r"
        );
    }
}
