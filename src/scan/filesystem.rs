use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Visible entries directly inside `dir`, symlinks resolved to their targets.
fn visible_entries(dir: &Path) -> impl Iterator<Item = DirEntry> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| !entry.file_name().to_string_lossy().starts_with('.'))
}

/// Immediate sub-directories of `root`, sorted by name. Dot-folders are skipped.
pub fn list_dirs(root: &Path) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = visible_entries(root)
        .filter(|entry| entry.file_type().is_dir())
        .map(|entry| entry.path().to_path_buf())
        .collect();
    dirs.sort();
    dirs
}

/// Files directly inside `dir` with the given extension, in natural order.
pub fn list_files_with_extension(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = visible_entries(dir)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path().to_path_buf())
        .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some(extension))
        .collect();
    files.sort_by(|a, b| natural_cmp(&a.to_string_lossy(), &b.to_string_lossy()));
    files
}

/// Contents of a readable file, even when blank.
pub fn read_to_string_if_exists(path: &Path) -> Option<String> {
    if !path.is_file() {
        return None;
    }
    std::fs::read_to_string(path).ok()
}

/// Contents of a readable file that holds more than whitespace.
pub fn read_report(path: &Path) -> Option<String> {
    read_to_string_if_exists(path).filter(|content| !content.trim().is_empty())
}

/// Orders digit runs by numeric value so `level2` sorts before `level10`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();
    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let l_digits = take_digits(&mut left);
                let r_digits = take_digits(&mut right);
                let l_trimmed = l_digits.trim_start_matches('0');
                let r_trimmed = r_digits.trim_start_matches('0');
                let ordering = l_trimmed
                    .len()
                    .cmp(&r_trimmed.len())
                    .then_with(|| l_trimmed.cmp(r_trimmed))
                    .then_with(|| l_digits.len().cmp(&r_digits.len()));
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(l), Some(r)) => {
                if l != r {
                    return l.cmp(&r);
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.peek().copied().filter(char::is_ascii_digit) {
        digits.push(c);
        chars.next();
    }
    digits
}
