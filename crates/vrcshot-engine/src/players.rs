use std::collections::HashMap;
use std::collections::VecDeque;

use vrcshot_types::{PlayerFact, PlayerFactKind, PlayerSession};

/// Pair join/leave facts into player stays.
///
/// `facts` must already be restricted to one session's time range and sorted
/// ascending by `(occurred_at, id)`, the shape `player_facts_between`
/// returns. A leave closes the earliest still-open join with the same name;
/// a leave with no open join means the player was present before logging
/// started and is dropped silently. Joins left open at the end are stays
/// that outlived the session window.
pub fn pair_player_sessions(facts: &[PlayerFact]) -> Vec<PlayerSession> {
    let mut stays: Vec<PlayerSession> = Vec::new();
    let mut open: HashMap<&str, VecDeque<usize>> = HashMap::new();

    for fact in facts {
        match fact.kind {
            PlayerFactKind::Join => {
                open.entry(fact.player_name.as_str())
                    .or_default()
                    .push_back(stays.len());
                stays.push(PlayerSession {
                    player_name: fact.player_name.clone(),
                    player_id: fact.player_id.clone(),
                    joined_at: fact.occurred_at,
                    left_at: None,
                });
            }
            PlayerFactKind::Leave => {
                let Some(queue) = open.get_mut(fact.player_name.as_str()) else {
                    continue;
                };
                let Some(idx) = queue.pop_front() else {
                    continue;
                };
                stays[idx].left_at = Some(fact.occurred_at);
            }
        }
    }

    stays
}

/// Collapse rejoins for display: one entry per player name, keeping the
/// earliest join and, when every stay ended, the latest leave.
pub fn distinct_players(stays: &[PlayerSession]) -> Vec<PlayerSession> {
    let mut order: Vec<PlayerSession> = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();

    for stay in stays {
        match seen.get(stay.player_name.as_str()) {
            None => {
                seen.insert(stay.player_name.as_str().to_string(), order.len());
                order.push(stay.clone());
            }
            Some(&idx) => {
                let merged = &mut order[idx];
                if merged.player_id.is_none() {
                    merged.player_id = stay.player_id.clone();
                }
                // An open stay keeps the merged entry open
                merged.left_at = match (merged.left_at, stay.left_at) {
                    (Some(a), Some(b)) => Some(a.max(b)),
                    _ => None,
                };
            }
        }
    }

    order
}
