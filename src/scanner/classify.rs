//! Source classification by file extension

use crate::extract::LanguageFamily;
use std::path::Path;

/// Map a path to its language family; `None` for unsupported or missing extensions
pub fn classify(path: impl AsRef<Path>) -> Option<LanguageFamily> {
    let extension = path.as_ref().extension()?.to_str()?;
    LanguageFamily::from_extension(extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_extensions() {
        assert_eq!(classify("src/app.py"), Some(LanguageFamily::Python));
        assert_eq!(classify("lib/thing.RB"), Some(LanguageFamily::Ruby));
        assert_eq!(classify("web/index.tsx"), Some(LanguageFamily::JavaScript));
        assert_eq!(classify("cmd/main.go"), Some(LanguageFamily::Go));
        assert_eq!(classify("include/vec.hpp"), Some(LanguageFamily::CLike));
    }

    #[test]
    fn test_classify_unsupported() {
        assert_eq!(classify("README.md"), None);
        assert_eq!(classify("Makefile"), None);
        assert_eq!(classify(".py"), None);
        assert_eq!(classify("archive.py.bak"), None);
        assert_eq!(classify(""), None);
    }
}
