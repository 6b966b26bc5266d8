use hashbrown::HashMap;

use crate::error::SectionError;

/// Declared section ids in page order, with a reverse index.
#[derive(Clone, Debug, Default)]
pub struct Sections {
    ids: Vec<String>,
    index: HashMap<String, usize>,
}

impl Sections {
    pub fn new<I, T>(ids: I) -> Result<Self, SectionError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut out = Sections::default();
        for id in ids {
            let id = id.into();
            if out.index.contains_key(&id) {
                return Err(SectionError::DuplicateSection(id));
            }
            out.index.insert(id.clone(), out.ids.len());
            out.ids.push(id);
        }
        if out.ids.is_empty() {
            return Err(SectionError::NoSections);
        }
        Ok(out)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn id(&self, index: usize) -> Option<&str> {
        self.ids.get(index).map(String::as_str)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_duplicates() {
        assert_eq!(
            Sections::new(Vec::<String>::new()).unwrap_err(),
            SectionError::NoSections
        );
        assert_eq!(
            Sections::new(["a", "b", "a"]).unwrap_err(),
            SectionError::DuplicateSection("a".into())
        );
    }

    #[test]
    fn keeps_page_order() {
        let s = Sections::new(["intro", "usage"]).unwrap();
        assert_eq!(s.position("usage"), Some(1));
        assert_eq!(s.id(0), Some("intro"));
        assert_eq!(s.position("missing"), None);
    }
}
