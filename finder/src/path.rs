use std::fmt;

/// A normalized, forward-slash path inside a [`crate::fs::FileSystem`]
/// namespace.
///
/// Normalization drops empty and `.` segments and resolves `..` lexically, so
/// two paths naming the same entry compare equal. Ordering is plain string
/// ordering, which is what session and file names rely on.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FsPath(String);

impl FsPath {
    pub fn new(raw: impl AsRef<str>) -> Self {
        let raw = raw.as_ref();
        let rooted = raw.starts_with('/');
        let mut segments: Vec<&str> = Vec::new();
        for segment in raw.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                other => segments.push(other),
            }
        }
        let joined = segments.join("/");
        if rooted {
            Self(format!("/{joined}"))
        } else {
            Self(joined)
        }
    }

    /// The namespace root of a filesystem that presents leading slashes.
    pub fn root() -> Self {
        Self("/".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_rooted(&self) -> bool {
        self.0.starts_with('/')
    }

    /// True for `""` and `"/"`.
    pub fn is_root(&self) -> bool {
        self.0.is_empty() || self.0 == "/"
    }

    /// Appends `segment`, which is always treated as relative.
    pub fn join(&self, segment: impl AsRef<str>) -> Self {
        let segment = segment.as_ref().trim_start_matches('/');
        if self.0.is_empty() {
            return Self::new(segment);
        }
        Self::new(format!("{}/{segment}", self.0))
    }

    pub fn file_name(&self) -> Option<&str> {
        if self.is_root() {
            return None;
        }
        self.0.rsplit('/').next()
    }

    /// Last dot-separated suffix of the file name. Names without a dot, or
    /// whose only dot is leading (`.hidden`), have no extension.
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name()?;
        let (stem, ext) = name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext)
    }

    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        match self.0.rsplit_once('/') {
            Some(("", _)) => Some(Self::root()),
            Some((parent, _)) => Some(Self(parent.to_string())),
            None => Some(Self::default()),
        }
    }

    /// Component-wise prefix removal. The remainder is relative.
    pub fn strip_prefix(&self, base: &FsPath) -> Option<Self> {
        if base.is_root() {
            if base.is_rooted() && !self.is_rooted() {
                return None;
            }
            return Some(Self(self.0.trim_start_matches('/').to_string()));
        }
        if self.0 == base.0 {
            return Some(Self::default());
        }
        let rest = self.0.strip_prefix(base.0.as_str())?.strip_prefix('/')?;
        Some(Self(rest.to_string()))
    }
}

impl fmt::Display for FsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FsPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FsPath {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for FsPath {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}
