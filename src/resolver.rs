//! Keeper selection for duplicate groups.

use crate::grouper::Group;
use crate::scanner::Folder;
use crate::scorer::PatternTable;

/// A folder with its quality score for one run. Scores are recomputed
/// each run, never persisted.
#[derive(Debug, Clone)]
pub struct ScoredFolder {
    pub folder: Folder,
    pub score: i64,
}

/// Keep/remove decision for one duplicate group: exactly one keeper,
/// the rest duplicates ordered by descending score.
#[derive(Debug, Clone)]
pub struct ResolutionPlan {
    pub group_key: String,
    pub keeper: ScoredFolder,
    pub duplicates: Vec<ScoredFolder>,
}

/// Decide which member of a duplicate group survives.
///
/// Pure computation, no side effects; deletion is someone else's job.
/// Singleton groups carry no decision and yield `None`. Ties on score
/// fall back to path order so repeated runs pick the same keeper.
pub fn resolve(group: &Group, table: &PatternTable) -> Option<ResolutionPlan> {
    if !group.is_duplicate_set() {
        return None;
    }

    let mut scored: Vec<ScoredFolder> = group
        .members
        .iter()
        .map(|member| ScoredFolder {
            score: table.score(&member.folder.name),
            folder: member.folder.clone(),
        })
        .collect();
    scored.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.folder.path.cmp(&b.folder.path))
    });

    let mut members = scored.into_iter();
    let keeper = members.next()?;
    Some(ResolutionPlan {
        group_key: group.key.clone(),
        keeper,
        duplicates: members.collect(),
    })
}

/// Resolve every multi-member group, preserving group order.
pub fn resolve_all(groups: &[Group], table: &PatternTable) -> Vec<ResolutionPlan> {
    groups
        .iter()
        .filter_map(|group| resolve(group, table))
        .collect()
}
