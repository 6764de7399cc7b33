// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `nat64_source.rs`

#[cfg(test)]
mod tests {
    use super::super::{embedded_ipv4, Nat64Source};
    use crate::endpoint::{Endpoint, RecordType, RefObject, Targets, Ttl};
    use crate::pipeline_errors::Nat64Error;
    use crate::source::Source;
    use crate::testutil::{counting_handler, MockError, MockSource};
    use std::net::{Ipv4Addr, Ipv6Addr};

    const DOC_PREFIX: &[&str] = &["2001:DB8::/96"];

    async fn nat64(input: Vec<Endpoint>) -> Vec<Endpoint> {
        let source = MockSource::new(input);
        let nat64 = Nat64Source::new(source.boxed(), DOC_PREFIX).unwrap();
        nat64.endpoints().await.unwrap()
    }

    // ========== Construction ==========

    #[test]
    fn test_empty_prefixes_succeed() {
        let nat64 = Nat64Source::new(MockSource::new(Vec::new()).boxed(), &[] as &[&str]).unwrap();
        assert!(nat64.prefixes().is_empty());
    }

    #[test]
    fn test_multiple_valid_prefixes() {
        let nat64 = Nat64Source::new(
            MockSource::new(Vec::new()).boxed(),
            &["2001:db8::/96", "64:ff9b::/96"],
        )
        .unwrap();

        let prefixes: Vec<String> = nat64.prefixes().iter().map(ToString::to_string).collect();
        assert_eq!(prefixes, vec!["2001:db8::/96", "64:ff9b::/96"]);
    }

    #[test]
    fn test_invalid_prefix_fails() {
        let Err(err) = Nat64Source::new(MockSource::new(Vec::new()).boxed(), &["invalid-prefix"])
        else {
            panic!("invalid prefix should be rejected");
        };
        assert!(matches!(err, Nat64Error::InvalidPrefix { .. }));
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_wrong_prefix_length_fails() {
        let Err(err) = Nat64Source::new(MockSource::new(Vec::new()).boxed(), &["2001:db8::/64"])
        else {
            panic!("/64 prefix should be rejected");
        };
        assert_eq!(
            err,
            Nat64Error::InvalidPrefixLength {
                prefix: "2001:db8::/64".to_string(),
                prefix_len: 64,
            }
        );
    }

    #[test]
    fn test_ipv4_prefix_fails() {
        let Err(err) = Nat64Source::new(MockSource::new(Vec::new()).boxed(), &["192.0.2.0/24"])
        else {
            panic!("IPv4 prefix should be rejected");
        };
        assert!(matches!(err, Nat64Error::NotIpv6 { .. }));
    }

    #[test]
    fn test_embedded_ipv4() {
        let ip: Ipv6Addr = "64:ff9b::c000:22a".parse().unwrap();
        assert_eq!(embedded_ipv4(&ip).unwrap(), Ipv4Addr::new(192, 0, 2, 42));
    }

    // ========== Synthesis ==========

    #[tokio::test]
    async fn test_non_nat64_ipv6_is_untouched() {
        let input = vec![Endpoint::new("foo.example.org", RecordType::Aaaa, ["2001:db8:1::1"])];
        assert_eq!(nat64(input.clone()).await, input);
    }

    #[tokio::test]
    async fn test_nat64_ipv6_adds_a_endpoint() {
        let aaaa = Endpoint::new("foo.example.org", RecordType::Aaaa, ["2001:db8::192.0.2.42"]);

        let endpoints = nat64(vec![aaaa.clone()]).await;

        assert_eq!(
            endpoints,
            vec![
                aaaa,
                Endpoint::new("foo.example.org", RecordType::A, ["192.0.2.42"]),
            ]
        );
    }

    #[tokio::test]
    async fn test_nat64_hex_notation() {
        let aaaa = Endpoint::new("foo.example.org", RecordType::Aaaa, ["2001:db8::c000:22a"]);

        let endpoints = nat64(vec![aaaa]).await;

        assert_eq!(endpoints.len(), 2);
        assert_eq!(endpoints[1].record_type, Some(RecordType::A));
        assert_eq!(endpoints[1].targets, Targets::new(["192.0.2.42"]));
    }

    #[tokio::test]
    async fn test_synthesized_endpoint_collects_mapped_targets_and_metadata() {
        let aaaa = Endpoint::with_ttl(
            "foo.example.org",
            RecordType::Aaaa,
            Ttl(120),
            ["2001:db8::c000:201", "2001:db8:1::1", "2001:db8::c000:202"],
        )
        .with_set_identifier("blue")
        .with_label("owner", "team-a");

        let endpoints = nat64(vec![aaaa.clone()]).await;

        assert_eq!(endpoints[0], aaaa);
        let v4 = &endpoints[1];
        assert_eq!(v4.targets, Targets::new(["192.0.2.1", "192.0.2.2"]));
        assert_eq!(v4.record_ttl, Ttl(120));
        assert_eq!(v4.set_identifier, "blue");
        assert_eq!(v4.labels, aaaa.labels);
    }

    #[tokio::test]
    async fn test_synthesized_endpoint_keeps_name_and_ref_object_verbatim() {
        let aaaa = Endpoint {
            dns_name: "foo.example.org.".to_string(),
            record_type: Some(RecordType::Aaaa),
            targets: Targets::new(["2001:db8::192.0.2.42"]),
            ref_object: Some(RefObject {
                kind: "Service".to_string(),
                namespace: "default".to_string(),
                name: "foo".to_string(),
                uid: "1234".to_string(),
                source: "service".to_string(),
            }),
            ..Default::default()
        };

        let endpoints = nat64(vec![aaaa.clone()]).await;

        assert_eq!(endpoints.len(), 2);
        let v4 = &endpoints[1];
        assert_eq!(v4.record_type, Some(RecordType::A));
        assert_eq!(v4.dns_name, aaaa.dns_name);
        assert_eq!(v4.ref_object, aaaa.ref_object);
        assert_eq!(v4.targets, Targets::new(["192.0.2.42"]));
    }

    #[tokio::test]
    async fn test_other_types_pass_through() {
        let input = vec![
            Endpoint::new("foo.example.org", RecordType::A, ["192.0.2.1"]),
            Endpoint::new("foo.example.org", RecordType::Cname, ["2001:db8::c000:22a"]),
            Endpoint::new("foo.example.org", RecordType::Txt, ["not an address"]),
        ];
        assert_eq!(nat64(input.clone()).await, input);
    }

    #[tokio::test]
    async fn test_invalid_aaaa_target_aborts_pull() {
        let source = MockSource::new(vec![
            Endpoint::new("ok.example.org", RecordType::Aaaa, ["2001:db8::c000:22a"]),
            Endpoint::new("bad.example.org", RecordType::Aaaa, ["not-an-ipv6"]),
        ]);
        let nat64 = Nat64Source::new(source.boxed(), DOC_PREFIX).unwrap();

        let err = nat64.endpoints().await.unwrap_err();

        let Some(Nat64Error::InvalidTarget {
            dns_name, target, ..
        }) = err.downcast_ref::<Nat64Error>()
        else {
            panic!("expected an invalid target error, got {err}");
        };
        assert_eq!(dns_name, "bad.example.org");
        assert_eq!(target, "not-an-ipv6");
    }

    #[tokio::test]
    async fn test_empty_prefixes_pass_through() {
        let input = vec![Endpoint::new(
            "foo.example.org",
            RecordType::Aaaa,
            ["2001:db8::c000:22a"],
        )];
        let source = MockSource::new(input.clone());
        let nat64 = Nat64Source::new(source.boxed(), &[] as &[&str]).unwrap();

        assert_eq!(nat64.endpoints().await.unwrap(), input);
    }

    #[tokio::test]
    async fn test_source_error_is_returned_unchanged() {
        let source = MockSource::failing("some error");
        let nat64 = Nat64Source::new(source.boxed(), DOC_PREFIX).unwrap();

        let err = nat64.endpoints().await.unwrap_err();

        assert!(err.downcast_ref::<MockError>().is_some());
    }

    // ========== Events ==========

    #[test]
    fn test_event_handler_is_forwarded_with_prefixes() {
        let source = MockSource::new(Vec::new());
        let nat64 = Nat64Source::new(source.boxed(), DOC_PREFIX).unwrap();

        let (handler, _) = counting_handler();
        nat64.add_event_handler(handler);

        assert_eq!(source.event_handler_calls(), 1);
    }

    #[test]
    fn test_event_handler_is_forwarded_without_prefixes() {
        let source = MockSource::new(Vec::new());
        let nat64 = Nat64Source::new(source.boxed(), &[] as &[&str]).unwrap();

        let (handler, _) = counting_handler();
        nat64.add_event_handler(handler);

        assert_eq!(source.event_handler_calls(), 1);
    }
}
