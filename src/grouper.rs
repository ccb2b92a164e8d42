//! Duplicate grouping over derived identities.

use crate::identity::{IdentifiedFolder, Identity};
use std::collections::BTreeMap;

/// Bucket key for the first grouping pass. IMDB buckets and name/year
/// buckets never mix, even when the strings happen to collide.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum BucketKey {
    Imdb(String),
    NameYear(String),
}

/// A set of folders resolving to the same underlying work.
#[derive(Debug, Clone)]
pub struct Group {
    /// Human-readable key: `imdb:tt0133093`, or the name/year canonical
    /// string, or `imdb:<id> (<name year>)` for refined sub-groups.
    pub key: String,
    pub members: Vec<IdentifiedFolder>,
}

impl Group {
    /// Only groups with two or more members carry a duplicate decision.
    pub fn is_duplicate_set(&self) -> bool {
        self.members.len() > 1
    }
}

/// Partition folders into duplicate groups.
///
/// Pass 1 buckets by IMDB id when present and by the name/year canonical
/// string otherwise. Pass 2 splits any IMDB bucket whose members disagree
/// on their name/year string: an id can be reused or guessed wrongly
/// across genuinely different releases (a remake sharing a title-derived
/// id, say), and a diverging name/year is the signal that the bucket
/// conflates two works. Singleton groups are emitted too; resolution
/// skips them later.
///
/// Output order is deterministic: buckets sorted by key, members by path.
pub fn group(folders: Vec<IdentifiedFolder>) -> Vec<Group> {
    let mut buckets: BTreeMap<BucketKey, Vec<IdentifiedFolder>> = BTreeMap::new();
    for folder in folders {
        let key = match &folder.identity {
            Identity::Imdb { id, .. } => BucketKey::Imdb(id.clone()),
            Identity::NameYear(name_year) => BucketKey::NameYear(name_year.clone()),
        };
        buckets.entry(key).or_default().push(folder);
    }

    let mut groups = Vec::new();
    for (key, members) in buckets {
        match key {
            BucketKey::Imdb(id) => groups.extend(refine(&id, members)),
            BucketKey::NameYear(name_year) => groups.push(finalize(name_year, members)),
        }
    }
    groups
}

/// Refinement pass: one sub-group per distinct name/year string.
fn refine(id: &str, members: Vec<IdentifiedFolder>) -> Vec<Group> {
    let mut by_name_year: BTreeMap<String, Vec<IdentifiedFolder>> = BTreeMap::new();
    for member in members {
        by_name_year
            .entry(member.identity.name_year().to_string())
            .or_default()
            .push(member);
    }

    let split = by_name_year.len() > 1;
    by_name_year
        .into_iter()
        .map(|(name_year, members)| {
            let key = if split {
                format!("imdb:{} ({})", id, name_year)
            } else {
                format!("imdb:{}", id)
            };
            finalize(key, members)
        })
        .collect()
}

fn finalize(key: String, mut members: Vec<IdentifiedFolder>) -> Group {
    members.sort_by(|a, b| a.folder.path.cmp(&b.folder.path));
    Group { key, members }
}
