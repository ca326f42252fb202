use rstest::rstest;
use x501_name::Name;
use x501_name::dn::{self, DnValue};

#[rstest]
#[case("cn=name")]
#[case("cn=one,cn=two")]
#[case("cn=one+cn=two,o=org")]
#[case(r"cn=Doe\, John,o=Example")]
#[case(r"cn=\ padded\ ")]
#[case(r"cn=\#hash")]
#[case(r#"cn=a\+b\;c\<d\>e\\f\""#)]
#[case(r"cn=zero\E2\80\8Bwidth")]
#[case("c=FI,o=Ääkkönen")]
#[case("1.3.6.1.3=#0101ff")]
#[case("1.3.6.1.3=#0202007f")]
#[case("")]
fn canonical_strings_round_trip(#[case] input: &str) {
    assert_eq!(input, Name::parse(input).unwrap().to_string());
}

#[rstest]
#[case("CN=name", "cn=name")]
#[case("cn = one ; o = org", "cn=one,o=org")]
#[case(r#"cn="a, b""#, r"cn=a\, b")]
#[case("OID.2.5.4.3=name", "cn=name")]
#[case("cn=\\20name", r"\ name")]
fn strings_are_canonicalized(#[case] input: &str, #[case] expected: &str) {
    let rendered = Name::parse(input).unwrap().to_string();
    assert!(rendered.ends_with(expected), "{rendered} does not end with {expected}");
}

#[test]
fn parser_is_usable_on_its_own() {
    let components = dn::parse("cn=one+sn=two,o=org").unwrap();
    assert_eq!(2, components.len());
    assert_eq!(
        vec![
            ("cn".to_string(), DnValue::String("one".to_string())),
            ("sn".to_string(), DnValue::String("two".to_string())),
        ],
        components[1]
    );
    let name = Name::from_name_components(components).unwrap();
    assert_eq!("cn=one+sn=two,o=org", name.to_string());
}

#[test]
fn escape_is_usable_on_its_own() {
    assert_eq!(r"\ a\,b\ ", dn::escape_string(" a,b ").unwrap());
    assert_eq!(r"\00", dn::escape_string("\0").unwrap());
}
