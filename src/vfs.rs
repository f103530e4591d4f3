use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// How the engine sources content files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunMode
{
    // archives are the only source of truth
    #[default]
    Packaged,
    // loose files on disk override nothing but fill in for paths no archive
    // carries, so content can be iterated without repacking
    Edit,
}

// One mounted bundle of content files, keyed by engine-relative path.
#[derive(Debug, Default)]
pub struct Archive
{
    name: String,
    content_version: u16,
    files: HashMap<PathBuf, Vec<u8>>,
}

impl Archive
{
    #[must_use]
    pub fn new(name: impl Into<String>, content_version: u16) -> Self
    {
        Self { name: name.into(), content_version, files: HashMap::new() }
    }

    // bundle every file under a directory root, keyed by path relative to it
    pub fn from_dir(name: impl Into<String>, content_version: u16, root: &Path) -> std::io::Result<Self>
    {
        let mut archive = Self::new(name, content_version);
        for entry in WalkDir::new(root)
        {
            let entry = entry?;
            if !entry.file_type().is_file()
            {
                continue;
            }

            let relative = entry.path().strip_prefix(root)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
            archive.insert(relative, std::fs::read(entry.path())?);
        }
        log::debug!("Archive '{}' bundled {} file(s) from {:?}", archive.name, archive.files.len(), root);
        Ok(archive)
    }

    #[inline] #[must_use]
    pub fn name(&self) -> &str { &self.name }

    #[inline] #[must_use]
    pub fn content_version(&self) -> u16 { self.content_version }

    #[inline] #[must_use]
    pub fn file_count(&self) -> usize { self.files.len() }

    pub fn insert(&mut self, path: impl Into<PathBuf>, bytes: Vec<u8>)
    {
        self.files.insert(path.into(), bytes);
    }

    #[must_use]
    pub fn contains(&self, path: &Path) -> bool
    {
        self.files.contains_key(path)
    }

    #[must_use]
    pub fn read(&self, path: &Path) -> Option<&[u8]>
    {
        self.files.get(path).map(Vec::as_slice)
    }
}

// The layered content source: archives probed in mount order, first hit wins.
#[derive(Debug, Default)]
pub struct VirtualFs
{
    archives: Vec<Archive>,
}

impl VirtualFs
{
    #[must_use]
    pub fn new() -> Self
    {
        Self { archives: Vec::new() }
    }

    pub fn mount(&mut self, archive: Archive)
    {
        log::debug!("Mounting archive '{}' (content v{})", archive.name(), archive.content_version());
        self.archives.push(archive);
    }

    #[inline] #[must_use]
    pub fn archive_count(&self) -> usize { self.archives.len() }

    #[must_use]
    pub fn contains(&self, path: &Path) -> bool
    {
        self.archives.iter().any(|a| a.contains(path))
    }

    #[must_use]
    pub fn read(&self, path: &Path) -> Option<&[u8]>
    {
        self.archives.iter().find_map(|a| a.read(path))
    }
}
