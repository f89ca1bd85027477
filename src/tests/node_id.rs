use std::str::FromStr;

use crate::*;

#[test]
fn node_id_is_null() {
    assert!(NodeId::null().is_null());
    assert!(!NodeId::new(0, 1u32).is_null());
    assert!(!NodeId::new(1, 0u32).is_null());
    assert!(!NodeId::new(0, "").is_null());
}

#[test]
fn node_id_from_str() {
    assert_eq!(NodeId::from_str("i=13").unwrap(), NodeId::new(0, 13u32));
    assert_eq!(
        NodeId::from_str("ns=2;s=Hello World").unwrap(),
        NodeId::new(2, "Hello World")
    );
    let guid = Guid::from_str("72962B91-FA75-4AE6-8D28-B404DC7DAF63").unwrap();
    assert_eq!(
        NodeId::from_str("ns=1;g=72962B91-FA75-4AE6-8D28-B404DC7DAF63").unwrap(),
        NodeId::new(1, guid)
    );
    assert_eq!(
        NodeId::from_str("ns=3;b=aGVsbG8=").unwrap(),
        NodeId::new(3, ByteString::from(b"hello"))
    );

    assert!(NodeId::from_str("").is_err());
    assert!(NodeId::from_str("i=").is_err());
    assert!(NodeId::from_str("x=1").is_err());
    assert!(NodeId::from_str("ns=hello;i=1").is_err());
}

#[test]
fn node_id_display() {
    assert_eq!(NodeId::new(0, 13u32).to_string(), "i=13");
    assert_eq!(NodeId::new(2, "Hello").to_string(), "ns=2;s=Hello");

    // Display and FromStr are inverses for numeric and string forms
    let node_id = NodeId::new(5, "round trip");
    assert_eq!(NodeId::from_str(&node_id.to_string()).unwrap(), node_id);
}

#[test]
fn expanded_node_id_from_str() {
    let e = ExpandedNodeId::from_str("svr=5;ns=2;i=100").unwrap();
    assert_eq!(e.server_index, 5);
    assert_eq!(e.node_id, NodeId::new(2, 100u32));
    assert!(e.namespace_uri.is_null());

    let e = ExpandedNodeId::from_str("svr=0;nsu=urn:a%3bb;s=x").unwrap();
    assert_eq!(e.server_index, 0);
    // Escaped ; is unescaped on parse
    assert_eq!(e.namespace_uri.as_ref(), "urn:a;b");
    assert_eq!(e.node_id.identifier, Identifier::String(UAString::from("x")));

    assert!(ExpandedNodeId::from_str("ns=2;i=100").is_err());
}

#[test]
fn expanded_node_id_display() {
    let mut e = ExpandedNodeId::new(NodeId::new(2, 100u32));
    e.server_index = 5;
    assert_eq!(e.to_string(), "svr=5;ns=2;i=100");
    assert_eq!(ExpandedNodeId::from_str(&e.to_string()).unwrap(), e);
}

#[test]
fn namespace_table() {
    let mut namespaces = NamespaceTable::new();
    assert_eq!(namespaces.uri(0), Some(crate::constants::OPC_UA_NAMESPACE_URI));
    assert_eq!(namespaces.len(), 1);

    let index = namespaces.add("urn:test");
    assert_eq!(index, 1);
    assert_eq!(namespaces.uri(1), Some("urn:test"));
    assert_eq!(namespaces.index_of("urn:test"), Some(1));

    // Adding an existing uri returns the existing index
    assert_eq!(namespaces.add("urn:test"), 1);
    assert_eq!(namespaces.len(), 2);

    assert_eq!(namespaces.uri(2), None);
    assert_eq!(namespaces.index_of("urn:other"), None);
}
