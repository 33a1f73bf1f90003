use std::{borrow::Cow, fmt, sync::Arc};

use smol_str::SmolStr;

use crate::error::{Error, Result};

/// A validated, non-empty SQL identifier.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ident(SmolStr);

impl Ident {
    pub fn new<T>(value: T) -> Result<Self>
    where
        T: Into<SmolStr>,
    {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(Error::EmptyIdentifier);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub(crate) fn to_smol(&self) -> SmolStr {
        self.0.clone()
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Ident {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

pub trait IntoIdent {
    fn into_ident(self) -> Result<Ident>;
}

impl IntoIdent for Ident {
    fn into_ident(self) -> Result<Ident> {
        Ok(self)
    }
}

impl IntoIdent for &Ident {
    fn into_ident(self) -> Result<Ident> {
        Ok(self.clone())
    }
}

impl IntoIdent for &str {
    #[inline]
    fn into_ident(self) -> Result<Ident> {
        Ident::new(self)
    }
}

impl IntoIdent for &String {
    #[inline]
    fn into_ident(self) -> Result<Ident> {
        Ident::new(self)
    }
}

impl IntoIdent for String {
    #[inline(always)]
    fn into_ident(self) -> Result<Ident> {
        Ident::new(self)
    }
}

impl IntoIdent for Box<str> {
    #[inline]
    fn into_ident(self) -> Result<Ident> {
        Ident::new(self)
    }
}

impl IntoIdent for Arc<str> {
    #[inline]
    fn into_ident(self) -> Result<Ident> {
        Ident::new(self.as_ref())
    }
}

impl<'a> IntoIdent for Cow<'a, str> {
    #[inline]
    fn into_ident(self) -> Result<Ident> {
        Ident::new(self)
    }
}

impl IntoIdent for SmolStr {
    #[inline(always)]
    fn into_ident(self) -> Result<Ident> {
        Ident::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ident_rejects_empty() {
        assert!(matches!(Ident::new(""), Err(Error::EmptyIdentifier)));
        assert!(matches!("   ".into_ident(), Err(Error::EmptyIdentifier)));
    }

    #[test]
    fn test_ident_keeps_spelling() {
        let ident = String::from("Employee").into_ident().unwrap();
        assert_eq!("Employee", ident.as_str());
        assert_eq!("Employee", ident.to_string());
    }
}
