//! PC-002: Resource address algebra.
//!
//! A plan address such as `module.net.module.vpc.aws_subnet.private[2]` splits into
//! a module prefix (`module.net.module.vpc.`), a resource part (`aws_subnet.private[2]`),
//! and an optional repetition index (`2`). Data sources keep their `data.` marker in
//! the resource part. Addresses with fewer than two segments are not produced by
//! Terraform; the functions here stay total on them but the results are unspecified.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static TRAILING_INDEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\d+)\]$").expect("static regex"));

/// Byte offset where the resource part begins.
fn resource_part_start(address: &str) -> usize {
    let segments: Vec<&str> = address.split('.').collect();
    let n = segments.len();
    let take = if n >= 3 && segments[n - 3] == "data" { 3 } else { 2 };
    let take = take.min(n);
    let suffix_len: usize = segments[n - take..].iter().map(|s| s.len()).sum::<usize>() + take - 1;
    address.len() - suffix_len
}

/// Trailing resource segment(s): `type.name[i]`, or `data.type.name[i]` for data sources.
pub fn resource_part(address: &str) -> &str {
    &address[resource_part_start(address)..]
}

/// Everything before the resource part; empty at top level, otherwise ends with `.`.
pub fn module_prefix(address: &str) -> &str {
    &address[..resource_part_start(address)]
}

/// Module names along the path, outermost first. Module instance keys are dropped.
pub fn module_path(address: &str) -> Vec<String> {
    module_names(module_prefix(address))
}

fn module_names(prefix: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut segments = prefix.split('.').filter(|s| !s.is_empty());
    while let Some(segment) = segments.next() {
        if segment != "module" {
            continue;
        }
        if let Some(name) = segments.next() {
            names.push(strip_repetition_index(name).to_string());
        }
    }
    names
}

/// The trailing `[n]` index, or `None` when absent or not a valid integer.
pub fn repetition_index(address: &str) -> Option<u32> {
    TRAILING_INDEX
        .captures(address)
        .and_then(|caps| caps[1].parse().ok())
}

/// Drop a bracketed instance suffix: `aws_instance.web[3]` → `aws_instance.web`.
pub fn strip_repetition_index(resource_part: &str) -> &str {
    match resource_part.find('[') {
        Some(pos) => &resource_part[..pos],
        None => resource_part,
    }
}

/// An address split into its parts. Displays back to the original address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Address<'a> {
    pub prefix: &'a str,
    pub resource: &'a str,
    pub index: Option<u32>,
}

impl<'a> Address<'a> {
    pub fn parse(address: &'a str) -> Self {
        let start = resource_part_start(address);
        Self {
            prefix: &address[..start],
            resource: &address[start..],
            index: repetition_index(address),
        }
    }

    /// Resource part without the repetition index; the key used in configuration.
    pub fn base(&self) -> &'a str {
        strip_repetition_index(self.resource)
    }

    pub fn module_path(&self) -> Vec<String> {
        module_names(self.prefix)
    }

    pub fn is_data_source(&self) -> bool {
        self.resource.starts_with("data.")
    }
}

impl fmt::Display for Address<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix, self.resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_pc002_top_level() {
        let addr = "aws_instance.web";
        assert_eq!(resource_part(addr), "aws_instance.web");
        assert_eq!(module_prefix(addr), "");
        assert!(module_path(addr).is_empty());
        assert_eq!(repetition_index(addr), None);
    }

    #[test]
    fn test_pc002_nested_modules() {
        let addr = "module.a.module.b.aws_instance.x[2]";
        assert_eq!(resource_part(addr), "aws_instance.x[2]");
        assert_eq!(module_prefix(addr), "module.a.module.b.");
        assert_eq!(module_path(addr), vec!["a", "b"]);
        assert_eq!(repetition_index(addr), Some(2));
    }

    #[test]
    fn test_pc002_data_source() {
        let addr = "module.net.data.aws_ami.ubuntu";
        assert_eq!(resource_part(addr), "data.aws_ami.ubuntu");
        assert_eq!(module_prefix(addr), "module.net.");
        assert_eq!(module_path(addr), vec!["net"]);
        assert!(Address::parse(addr).is_data_source());
    }

    #[test]
    fn test_pc002_indexed_module_instance() {
        let addr = "module.app[1].aws_instance.web";
        assert_eq!(module_path(addr), vec!["app"]);
        assert_eq!(module_prefix(addr), "module.app[1].");
        // Module index is not the resource's repetition index.
        assert_eq!(repetition_index(addr), None);
    }

    #[test]
    fn test_pc002_unparsable_index() {
        assert_eq!(repetition_index(r#"aws_instance.web["blue"]"#), None);
        assert_eq!(repetition_index("aws_instance.web[99999999999]"), None);
    }

    #[test]
    fn test_pc002_strip_index() {
        assert_eq!(strip_repetition_index("aws_instance.web[3]"), "aws_instance.web");
        assert_eq!(strip_repetition_index("aws_instance.web"), "aws_instance.web");
        assert_eq!(strip_repetition_index(r#"aws_instance.web["k"]"#), "aws_instance.web");
    }

    #[test]
    fn test_pc002_address_display_and_base() {
        let a = Address::parse("module.db.aws_db_instance.main[0]");
        assert_eq!(a.prefix, "module.db.");
        assert_eq!(a.base(), "aws_db_instance.main");
        assert_eq!(a.index, Some(0));
        assert_eq!(a.module_path(), vec!["db"]);
        assert_eq!(a.to_string(), "module.db.aws_db_instance.main[0]");
    }

    fn arb_address() -> impl Strategy<Value = String> {
        (
            prop::collection::vec("[a-z][a-z0-9_]{0,8}", 0..4),
            any::<bool>(),
            "[a-z]{2,6}_[a-z]{2,8}",
            "[a-z][a-z0-9_]{0,8}",
            prop::option::of(0u32..500),
        )
            .prop_map(|(modules, data, ty, name, index)| {
                let mut addr = String::new();
                for m in modules {
                    addr.push_str(&format!("module.{m}."));
                }
                if data {
                    addr.push_str("data.");
                }
                addr.push_str(&format!("{ty}.{name}"));
                if let Some(i) = index {
                    addr.push_str(&format!("[{i}]"));
                }
                addr
            })
    }

    proptest! {
        #[test]
        fn prop_pc002_prefix_plus_resource_roundtrips(addr in arb_address()) {
            let joined = format!("{}{}", module_prefix(&addr), resource_part(&addr));
            prop_assert_eq!(&joined, &addr);
            prop_assert_eq!(Address::parse(&addr).to_string(), addr.clone());
            let prefix = module_prefix(&addr);
            prop_assert!(prefix.is_empty() || prefix.ends_with('.'));
        }

        #[test]
        fn prop_pc002_index_symmetry(addr in arb_address()) {
            let part = resource_part(&addr);
            match repetition_index(&addr) {
                Some(i) => {
                    let suffix = format!("[{i}]");
                    prop_assert!(addr.ends_with(&suffix));
                    prop_assert_eq!(strip_repetition_index(part), part.trim_end_matches(&suffix));
                }
                None => {
                    prop_assert!(!addr.ends_with(']'));
                    prop_assert_eq!(strip_repetition_index(part), part);
                }
            }
        }
    }
}
