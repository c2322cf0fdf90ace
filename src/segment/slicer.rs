//! Copying page subsets of a PDF into new files.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::{Error, Result};

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic `Parent` chains in malformed files.
const MAX_TREE_DEPTH: usize = 64;

/// A loaded source PDF.
///
/// The document is parsed once; every extract works on a clone, so the
/// source is never modified.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    path: PathBuf,
    document: Document,
    /// Page object ids in document order
    page_ids: Vec<ObjectId>,
}

impl SourceDocument {
    /// Load the PDF at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let document = Document::load(&path)?;
        Ok(Self::from_document(path, document))
    }

    /// Wrap an already-loaded document.
    pub fn from_document(path: impl Into<PathBuf>, document: Document) -> Self {
        let page_ids: Vec<ObjectId> = document.get_pages().into_values().collect();
        let path = path.into();
        log::debug!("Loaded {} ({} pages)", path.display(), page_ids.len());
        Self {
            path,
            document,
            page_ids,
        }
    }

    /// Where the document was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of physical pages.
    pub fn page_count(&self) -> u32 {
        self.page_ids.len() as u32
    }

    /// Write the given 1-based physical pages to `output`, in document order.
    ///
    /// Pages outside the document are ignored. The copy's page tree is
    /// rebuilt as a single flat node holding only the kept pages, then
    /// unreferenced objects are pruned. Returns the number of pages written.
    pub fn extract(&self, pages: impl IntoIterator<Item = u32>, output: &Path) -> Result<u32> {
        let wanted: BTreeSet<u32> = pages
            .into_iter()
            .filter(|&p| p >= 1 && p <= self.page_count())
            .collect();
        let keep: Vec<ObjectId> = wanted
            .iter()
            .map(|&p| self.page_ids[p as usize - 1])
            .collect();

        let mut document = self.document.clone();
        retain_pages(&mut document, &keep)?;

        let write_error = |reason: String| Error::Write {
            path: output.to_path_buf(),
            reason,
        };
        let file = File::create(output).map_err(|e| write_error(e.to_string()))?;
        let mut writer = BufWriter::new(file);
        document
            .save_to(&mut writer)
            .map_err(|e| write_error(e.to_string()))?;
        writer.flush().map_err(|e| write_error(e.to_string()))?;

        log::debug!("Wrote {} pages to {}", keep.len(), output.display());
        Ok(keep.len() as u32)
    }
}

/// Make `keep` the only pages of `document`, hung directly off the root
/// page tree node.
fn retain_pages(document: &mut Document, keep: &[ObjectId]) -> Result<()> {
    let root_id = document.catalog()?.get(b"Pages")?.as_reference()?;

    for &page_id in keep {
        let inherited = inherited_attributes(document, page_id, root_id)?;
        let page = document.get_object_mut(page_id)?.as_dict_mut()?;
        for (key, value) in inherited {
            page.set(key, value);
        }
        page.set("Parent", root_id);
    }

    let root = document.get_object_mut(root_id)?.as_dict_mut()?;
    root.set(
        "Kids",
        keep.iter().map(|&id| Object::Reference(id)).collect::<Vec<_>>(),
    );
    root.set("Count", keep.len() as i64);

    document.prune_objects();
    Ok(())
}

/// Attributes `page_id` inherits from intermediate tree nodes and does not
/// set itself. The root's own attributes stay in place and need no copy.
fn inherited_attributes(
    document: &Document,
    page_id: ObjectId,
    root_id: ObjectId,
) -> Result<Vec<(Vec<u8>, Object)>> {
    let page = document.get_dictionary(page_id)?;
    let mut found: Vec<(Vec<u8>, Object)> = Vec::new();
    let mut parent = parent_of(page);

    for _ in 0..MAX_TREE_DEPTH {
        let Some(node_id) = parent.filter(|&id| id != root_id) else {
            break;
        };
        let node = document.get_dictionary(node_id)?;
        for key in INHERITABLE {
            let already = page.has(key) || found.iter().any(|(k, _)| k.as_slice() == key);
            if already {
                continue;
            }
            if let Ok(value) = node.get(key) {
                found.push((key.to_vec(), value.clone()));
            }
        }
        parent = parent_of(node);
    }
    Ok(found)
}

fn parent_of(node: &Dictionary) -> Option<ObjectId> {
    node.get(b"Parent").and_then(Object::as_reference).ok()
}
