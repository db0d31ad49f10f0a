use crate::workspace::PickedFile;
use std::cmp::Ordering;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileTreeNode {
    Directory(BTreeMap<String, FileTreeNode>),
    Leaf(PickedFile),
}

impl Default for FileTreeNode {
    fn default() -> Self {
        Self::Directory(BTreeMap::new())
    }
}

/// Nests a flat file list by path component. Later duplicates win.
pub fn build_file_tree(files: &[PickedFile]) -> FileTreeNode {
    let mut root = BTreeMap::new();
    'files: for file in files {
        let parts: Vec<&str> = file
            .relative_path
            .split('/')
            .filter(|part| !part.is_empty())
            .collect();
        let Some((last, dirs)) = parts.split_last() else {
            continue;
        };

        let mut current = &mut root;
        for part in dirs {
            let node = current
                .entry((*part).to_string())
                .or_insert_with(FileTreeNode::default);
            if matches!(node, FileTreeNode::Leaf(_)) {
                *node = FileTreeNode::default();
            }
            let FileTreeNode::Directory(children) = node else {
                continue 'files;
            };
            current = children;
        }
        current.insert((*last).to_string(), FileTreeNode::Leaf(file.clone()));
    }
    FileTreeNode::Directory(root)
}

impl FileTreeNode {
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::Directory(children) => children.values().map(Self::leaf_count).sum(),
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            Self::Leaf(_) => 0,
            Self::Directory(children) => children
                .values()
                .map(|child| child.depth() + 1)
                .max()
                .unwrap_or(0),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Directory(children) if children.is_empty())
    }
}

pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

pub struct PartitionedChildren<'a> {
    pub folders: Vec<(&'a str, &'a BTreeMap<String, FileTreeNode>)>,
    pub files: Vec<(&'a str, &'a PickedFile)>,
}

pub fn partition_children(children: &BTreeMap<String, FileTreeNode>) -> PartitionedChildren<'_> {
    let mut folders = Vec::new();
    let mut files = Vec::new();
    for (name, node) in children {
        match node {
            FileTreeNode::Directory(grandchildren) => folders.push((name.as_str(), grandchildren)),
            FileTreeNode::Leaf(file) => files.push((name.as_str(), file)),
        }
    }
    folders.sort_by(|a, b| compare_names(a.0, b.0));
    files.sort_by(|a, b| compare_names(a.0, b.0));
    PartitionedChildren { folders, files }
}
