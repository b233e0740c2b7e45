use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global string interner for annotation IDs for fast comparisons.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Monotonic counter shared by every generated ID. Never reset, so an ID
/// is never handed out twice within a process.
static COUNTER: AtomicU64 = AtomicU64::new(0);

/// An opaque, interned identifier for an annotation.
/// Internally a 4-byte `Spur` index, so copies and comparisons are O(1).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnnotationId(Spur);

impl AnnotationId {
    /// Intern a string as an AnnotationId, or return the existing one.
    ///
    /// Used to look up IDs that crossed a text boundary (JSON, JS bridge).
    /// It never allocates a fresh identity: only [`AnnotationId::generate`] does.
    pub fn intern(s: &str) -> Self {
        AnnotationId(INTERNER.get_or_intern(s))
    }

    /// Look up an already-issued ID without interning a new string.
    pub fn lookup(s: &str) -> Option<Self> {
        INTERNER.get(s).map(AnnotationId)
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Generate a fresh unique ID with a prefix (e.g. `drawn_4`, `detected_0`).
    pub fn generate(prefix: &str) -> Self {
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        Self::intern(&format!("{prefix}_{n}"))
    }
}

impl fmt::Debug for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AnnotationId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AnnotationId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(AnnotationId::intern(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = AnnotationId::intern("sofa");
        let b = AnnotationId::intern("sofa");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "sofa");
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = AnnotationId::generate("drawn");
        let b = AnnotationId::generate("drawn");
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("drawn_"));
    }

    #[test]
    fn lookup_does_not_intern() {
        assert_eq!(AnnotationId::lookup("never_issued_id_xyz"), None);
        let id = AnnotationId::generate("detected");
        assert_eq!(AnnotationId::lookup(id.as_str()), Some(id));
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = AnnotationId::intern("lamp_7");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"lamp_7\"");
        let back: AnnotationId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
