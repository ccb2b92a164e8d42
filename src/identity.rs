//! Canonical identity derivation for release folders.
//!
//! Two folders are candidates for deduplication when they resolve to the
//! same identity: an IMDB id pulled from an `.nfo` sidecar when one exists,
//! otherwise a normalized `"<title> <year>"` string derived from the folder
//! name. Identity derivation is best-effort by design; it must produce a
//! usable key for every folder, however mangled the naming.

use crate::scanner::Folder;
use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

lazy_static! {
    /// IMDB title ids as they appear inside `.nfo` sidecars.
    static ref IMDB_ID: Regex = Regex::new(r"(?i)\btt\d{7,8}\b").unwrap();
    /// Leading title fragment followed by a plausible release year.
    /// The 1900-2099 constraint keeps resolution tags like `2160` from
    /// being mistaken for a year.
    static ref TITLE_YEAR: Regex =
        Regex::new(r"^(?P<title>.*?)[.\s_\-(\[]*(?P<year>(?:19|20)\d{2})\b").unwrap();
    /// Separator runs collapsed into single spaces.
    static ref SEPARATORS: Regex = Regex::new(r"[.\s_\-]+").unwrap();
    /// Release-tag noise that commonly trails a title.
    static ref NOISE_TOKEN: Regex = Regex::new(
        r"(?i)^(?:480p|576p|720p|1080p|2160p|4k|uhd|hdr(?:10)?|bluray|blu-ray|bdrip|brrip|remux|web-?dl|webrip|hdtv|dvdrip|dvd|x264|x265|h\.?264|h\.?265|hevc|avc|xvid|divx|aac(?:\d\.\d)?|ac3|eac3|dts(?:-hd)?|truehd|atmos|proper|repack|extended|unrated|uncut|remastered|limited|internal|multi|subbed|dubbed)$"
    )
    .unwrap();
}

/// Canonical grouping key for a release folder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    /// Normalized IMDB id from a sidecar. Carries the folder's name/year
    /// string as well, so the grouper can split buckets whose id was
    /// reused across genuinely different works.
    Imdb { id: String, name_year: String },
    /// Name-derived fallback when no sidecar id exists.
    NameYear(String),
}

impl Identity {
    /// The name/year canonical string, regardless of variant.
    pub fn name_year(&self) -> &str {
        match self {
            Identity::Imdb { name_year, .. } => name_year,
            Identity::NameYear(name_year) => name_year,
        }
    }
}

/// A folder paired with its identity, computed once per run.
#[derive(Debug, Clone)]
pub struct IdentifiedFolder {
    pub folder: Folder,
    pub identity: Identity,
}

/// Derive identities for a whole scan, preserving folder order.
pub fn identify_all(folders: Vec<Folder>) -> Vec<IdentifiedFolder> {
    folders
        .into_iter()
        .map(|folder| {
            let identity = identify(&folder);
            IdentifiedFolder { folder, identity }
        })
        .collect()
}

/// Derive the canonical identity for one release folder.
///
/// The `.nfo` sidecar wins when it contains an IMDB id; missing or
/// unreadable sidecars are a normal input state and silently fall back to
/// the name/year form.
pub fn identify(folder: &Folder) -> Identity {
    let name_year = canonicalize_name(&folder.name);
    match imdb_id_from_folder(&folder.path) {
        Some(id) => Identity::Imdb { id, name_year },
        None => Identity::NameYear(name_year),
    }
}

/// Lowercase `"<title> <year>"` canonical form of a folder name.
///
/// Degrades gracefully: no parseable year means title-only, an empty title
/// means the whole normalized name, and a name that normalizes to nothing
/// falls back to the raw lowercased name. Never returns an empty string
/// for a non-empty input.
pub fn canonicalize_name(name: &str) -> String {
    if let Some(caps) = TITLE_YEAR.captures(name) {
        if let (Some(title), Some(year)) = (caps.name("title"), caps.name("year")) {
            let title = normalize(title.as_str());
            if !title.is_empty() {
                return format!("{} {}", title, year.as_str());
            }
        }
    }

    let full = normalize(name);
    if !full.is_empty() {
        return full;
    }
    name.trim().to_lowercase()
}

/// Collapse separators to spaces, lowercase, and drop trailing
/// release-tag noise tokens.
fn normalize(fragment: &str) -> String {
    let collapsed = SEPARATORS.replace_all(fragment, " ");
    let mut tokens: Vec<&str> = collapsed.split_whitespace().collect();
    while let Some(last) = tokens.last() {
        if NOISE_TOKEN.is_match(last) {
            tokens.pop();
        } else {
            break;
        }
    }
    tokens.join(" ").to_lowercase()
}

/// Scan `.nfo` sidecars inside the folder for an IMDB id.
///
/// Sidecars are visited in sorted order so repeated runs extract the same
/// id when several are present. Unreadable files and non-UTF8 bytes are
/// tolerated; `None` just means "use the name/year fallback".
fn imdb_id_from_folder(dir: &Path) -> Option<String> {
    let entries = fs::read_dir(dir).ok()?;
    let mut sidecars: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .map(|ext| ext.eq_ignore_ascii_case("nfo"))
                .unwrap_or(false)
        })
        .collect();
    sidecars.sort();

    for sidecar in sidecars {
        let raw = match fs::read(&sidecar) {
            Ok(raw) => raw,
            Err(_) => continue,
        };
        let text = String::from_utf8_lossy(&raw);
        if let Some(found) = IMDB_ID.find(&text) {
            return Some(found.as_str().trim().to_lowercase());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn folder_at(path: &Path, name: &str) -> Folder {
        Folder::new(path.join(name))
    }

    #[test]
    fn canonicalize_title_and_year() {
        assert_eq!(
            canonicalize_name("Movie.Title.2014.BluRay.x264"),
            "movie title 2014"
        );
        assert_eq!(
            canonicalize_name("Movie Title (2014) 1080p"),
            "movie title 2014"
        );
        assert_eq!(
            canonicalize_name("movie_title_2014_DVDRip_XviD"),
            "movie title 2014"
        );
    }

    #[test]
    fn canonicalize_is_deterministic() {
        let name = "Some.Film.1987.REMASTERED.720p";
        assert_eq!(canonicalize_name(name), canonicalize_name(name));
    }

    #[test]
    fn resolution_tag_is_not_a_year() {
        // 2160 is outside 1900-2099, so this name has no year at all
        assert_eq!(canonicalize_name("Some.Movie.2160p.x265"), "some movie");
        assert_eq!(canonicalize_name("Movie.Title.2160"), "movie title 2160");
    }

    #[test]
    fn missing_year_degrades_to_title_only() {
        assert_eq!(
            canonicalize_name("Obscure.Short.Film.WEB-DL"),
            "obscure short film"
        );
    }

    #[test]
    fn year_leading_title_falls_back_to_full_name() {
        // The lazy title match would leave an empty title here; the whole
        // normalized name is the next best key.
        let canonical = canonicalize_name("2012.Disaster.Movie");
        assert!(!canonical.is_empty());
        assert!(canonical.contains("disaster"));
    }

    #[test]
    fn unparseable_name_still_yields_a_key() {
        assert_eq!(canonicalize_name("???"), "???");
        assert_eq!(canonicalize_name("x"), "x");
    }

    #[test]
    fn identify_prefers_sidecar_imdb_id() {
        let dir = tempfile::tempdir().unwrap();
        let release = dir.path().join("The.Matrix.1999.BluRay.x264");
        fs::create_dir(&release).unwrap();
        fs::write(
            release.join("movie.nfo"),
            "<nfo>https://www.imdb.com/title/TT0133093/</nfo>",
        )
        .unwrap();

        let identity = identify(&Folder::new(release));
        assert_eq!(
            identity,
            Identity::Imdb {
                id: "tt0133093".to_string(),
                name_year: "the matrix 1999".to_string(),
            }
        );
    }

    #[test]
    fn identify_falls_back_without_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let release = dir.path().join("The.Matrix.1999.DVDRip");
        fs::create_dir(&release).unwrap();

        let identity = identify(&Folder::new(release));
        assert_eq!(identity, Identity::NameYear("the matrix 1999".to_string()));
    }

    #[test]
    fn identify_falls_back_when_sidecar_has_no_id() {
        let dir = tempfile::tempdir().unwrap();
        let release = dir.path().join("Heat.1995.BluRay");
        fs::create_dir(&release).unwrap();
        fs::write(release.join("info.nfo"), "no id in here").unwrap();

        let identity = identify(&Folder::new(release));
        assert_eq!(identity, Identity::NameYear("heat 1995".to_string()));
    }

    #[test]
    fn identify_tolerates_missing_folder() {
        // Folder vanished between scan and identify: still not an error
        let dir = tempfile::tempdir().unwrap();
        let folder = folder_at(dir.path(), "Gone.2001.BluRay");
        let identity = identify(&folder);
        assert_eq!(identity, Identity::NameYear("gone 2001".to_string()));
    }

    #[test]
    fn sidecars_are_read_in_sorted_order() {
        let dir = tempfile::tempdir().unwrap();
        let release = dir.path().join("Saga.2014.BluRay");
        fs::create_dir(&release).unwrap();
        fs::write(release.join("b.nfo"), "tt9999999").unwrap();
        fs::write(release.join("a.nfo"), "tt0044706").unwrap();

        let first = identify(&Folder::new(release.clone()));
        let second = identify(&Folder::new(release));
        assert_eq!(first, second);
        assert_eq!(
            first,
            Identity::Imdb {
                id: "tt0044706".to_string(),
                name_year: "saga 2014".to_string(),
            }
        );
    }
}
