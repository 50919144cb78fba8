use std::fmt;

use crate::utils::type_name;

/// Lexical path used to name inline types, eg. `User::address::kind`.
///
/// Builders receive a context by reference and hand an extended copy to their
/// children; a context is never mutated after being passed down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingContext {
    segments: Vec<String>,
}

impl NamingContext {
    pub fn root<N: Into<String>>(name: N) -> NamingContext {
        NamingContext {
            segments: vec![name.into()],
        }
    }

    pub fn child<N: Into<String>>(&self, segment: N) -> NamingContext {
        let mut context = self.clone();
        context.segments.push(segment.into());
        context
    }

    /// Join the path into one UpperCamelCase identifier.
    ///
    /// The root segment is a declared name and is kept verbatim.
    pub fn to_type_name(&self) -> String {
        let mut segments = self.segments.iter();
        let base = segments.next().cloned().unwrap_or_default();
        segments.fold(base, |acc, segment| acc + &type_name(segment))
    }
}

impl fmt::Display for NamingContext {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.segments.join("::"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_names() {
        let user = NamingContext::root("User");
        let kind = user.child("address").child("street_kind");
        assert_eq!(kind.to_type_name(), "UserAddressStreetKind");
        assert_eq!(kind.to_string(), "User::address::street_kind");
        assert_eq!(user.to_type_name(), "User");
    }

    #[test]
    fn test_service_roles() {
        let service = NamingContext::root("getUser");
        assert_eq!(service.child("request").to_type_name(), "getUserRequest");
        assert_eq!(service.child("response").child("404").to_type_name(), "getUserResponse404");
    }
}
