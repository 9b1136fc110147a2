use serde::Serialize;

use vrcshot_types::{PhotoRecord, WorldJoinSession};

/// Photos attributed to one world-join session, or to the "ungrouped" bucket
/// (`session: None`) for photos taken before any known join event.
///
/// Derived on every call and never persisted, so losing a grouping result can
/// never lose data.
#[derive(Debug, Clone, Serialize)]
pub struct PhotoGroup {
    pub session: Option<WorldJoinSession>,
    /// Ascending by `taken_at`
    pub photos: Vec<PhotoRecord>,
}

/// Assign each photo to the session whose time range contains it.
///
/// `sessions` must be ascending by `(joined_at, id)`, the storage order.
/// A session's range runs from its own `joined_at` to the next session's
/// `joined_at` (open-ended for the last), so the owning session for a photo
/// is the latest one joined at or before `taken_at`: one binary search per
/// photo, O(P log S). Sessions with no photos still get a group; the
/// ungrouped bucket is emitted first, and only when non-empty.
///
/// When duplicate log data yields two sessions with an identical `joined_at`,
/// the id order decides ownership (the later insertion wins, as it does in
/// the search), which keeps repeated calls byte-stable.
pub fn group_photos(sessions: &[WorldJoinSession], photos: &[PhotoRecord]) -> Vec<PhotoGroup> {
    debug_assert!(
        sessions
            .windows(2)
            .all(|w| (w[0].joined_at, w[0].id) <= (w[1].joined_at, w[1].id)),
        "sessions must be ordered by (joined_at, id)"
    );

    let mut buckets: Vec<Vec<PhotoRecord>> = vec![Vec::new(); sessions.len()];
    let mut ungrouped: Vec<PhotoRecord> = Vec::new();

    for photo in photos {
        let idx = sessions.partition_point(|s| s.joined_at <= photo.taken_at);
        if idx == 0 {
            ungrouped.push(photo.clone());
        } else {
            buckets[idx - 1].push(photo.clone());
        }
    }

    let mut groups = Vec::with_capacity(sessions.len() + 1);
    if !ungrouped.is_empty() {
        sort_photos(&mut ungrouped);
        groups.push(PhotoGroup {
            session: None,
            photos: ungrouped,
        });
    }
    for (session, mut photos) in sessions.iter().zip(buckets) {
        sort_photos(&mut photos);
        groups.push(PhotoGroup {
            session: Some(session.clone()),
            photos,
        });
    }
    groups
}

fn sort_photos(photos: &mut [PhotoRecord]) {
    photos.sort_by(|a, b| (a.taken_at, a.id).cmp(&(b.taken_at, b.id)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use vrcshot_types::{WorldId, parse_store_timestamp};

    fn session(id: i64, world: &str, joined_at: &str) -> WorldJoinSession {
        WorldJoinSession {
            id,
            world_id: WorldId::parse(world).unwrap(),
            instance_id: None,
            world_name: None,
            joined_at: parse_store_timestamp(joined_at).unwrap(),
            created_at: parse_store_timestamp(joined_at).unwrap(),
        }
    }

    fn photo(id: i64, taken_at: &str) -> PhotoRecord {
        let ts = parse_store_timestamp(taken_at).unwrap();
        PhotoRecord {
            id,
            photo_path: format!("/photos/{}.png", id),
            taken_at: ts,
            width: 1920,
            height: 1080,
            created_at: ts,
            updated_at: ts,
        }
    }

    const WORLD_A: &str = "wrld_4432ea9b-729c-46e3-8eaf-846aa0a37fdd";
    const WORLD_B: &str = "wrld_97f2ea9b-1111-46e3-8eaf-846aa0a37f00";

    fn taken_times(group: &PhotoGroup) -> Vec<String> {
        group
            .photos
            .iter()
            .map(|p| p.taken_at.format("%H:%M").to_string())
            .collect()
    }

    #[test]
    fn test_reference_scenario() {
        // Joins at 10:00 and 12:00; photos at 09:30, 10:15, 11:50, 12:30
        let sessions = vec![
            session(1, WORLD_A, "2024-01-15 10:00:00"),
            session(2, WORLD_B, "2024-01-15 12:00:00"),
        ];
        let photos = vec![
            photo(1, "2024-01-15 09:30:00"),
            photo(2, "2024-01-15 10:15:00"),
            photo(3, "2024-01-15 11:50:00"),
            photo(4, "2024-01-15 12:30:00"),
        ];

        let groups = group_photos(&sessions, &photos);
        assert_eq!(groups.len(), 3);

        assert!(groups[0].session.is_none());
        assert_eq!(taken_times(&groups[0]), vec!["09:30"]);

        assert_eq!(
            groups[1].session.as_ref().unwrap().world_id.as_str(),
            WORLD_A
        );
        assert_eq!(taken_times(&groups[1]), vec!["10:15", "11:50"]);

        assert_eq!(
            groups[2].session.as_ref().unwrap().world_id.as_str(),
            WORLD_B
        );
        assert_eq!(taken_times(&groups[2]), vec!["12:30"]);
    }

    #[test]
    fn test_containment_invariant() {
        let sessions = vec![
            session(1, WORLD_A, "2024-01-15 10:00:00"),
            session(2, WORLD_B, "2024-01-15 12:00:00"),
        ];
        let photos: Vec<_> = (0..50)
            .map(|i| photo(i, &format!("2024-01-15 {:02}:{:02}:00", 9 + (i % 6), i % 60)))
            .collect();

        let groups = group_photos(&sessions, &photos);
        for group in &groups {
            let Some(s) = &group.session else { continue };
            let next_start = sessions
                .iter()
                .find(|o| o.joined_at > s.joined_at)
                .map(|o| o.joined_at);
            for p in &group.photos {
                assert!(s.joined_at <= p.taken_at);
                if let Some(next) = next_start {
                    assert!(p.taken_at < next);
                }
            }
        }
    }

    #[test]
    fn test_photo_at_exact_join_time_belongs_to_that_session() {
        let sessions = vec![
            session(1, WORLD_A, "2024-01-15 10:00:00"),
            session(2, WORLD_B, "2024-01-15 12:00:00"),
        ];
        let photos = vec![photo(1, "2024-01-15 12:00:00")];

        let groups = group_photos(&sessions, &photos);
        let owner = groups
            .iter()
            .find(|g| !g.photos.is_empty())
            .unwrap()
            .session
            .as_ref()
            .unwrap();
        assert_eq!(owner.world_id.as_str(), WORLD_B);
    }

    #[test]
    fn test_empty_sessions_are_surfaced() {
        let sessions = vec![
            session(1, WORLD_A, "2024-01-15 10:00:00"),
            session(2, WORLD_B, "2024-01-15 12:00:00"),
        ];
        let photos = vec![photo(1, "2024-01-15 10:30:00")];

        let groups = group_photos(&sessions, &photos);
        assert_eq!(groups.len(), 2);
        assert!(groups[1].photos.is_empty(), "session without photos still shown");
    }

    #[test]
    fn test_no_ungrouped_bucket_when_empty() {
        let sessions = vec![session(1, WORLD_A, "2024-01-15 10:00:00")];
        let photos = vec![photo(1, "2024-01-15 10:30:00")];

        let groups = group_photos(&sessions, &photos);
        assert_eq!(groups.len(), 1);
        assert!(groups[0].session.is_some());
    }

    #[test]
    fn test_duplicate_join_times_resolve_deterministically() {
        let sessions = vec![
            session(1, WORLD_A, "2024-01-15 10:00:00"),
            session(2, WORLD_B, "2024-01-15 10:00:00"),
        ];
        let photos = vec![photo(1, "2024-01-15 10:30:00")];

        let first = group_photos(&sessions, &photos);
        let second = group_photos(&sessions, &photos);

        // The later insertion owns the photo, on every call
        assert!(first[0].photos.is_empty());
        assert_eq!(first[1].photos.len(), 1);
        assert_eq!(second[1].photos.len(), 1);
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let sessions = vec![
            session(1, WORLD_A, "2024-01-15 10:00:00"),
            session(2, WORLD_B, "2024-01-15 12:00:00"),
        ];
        let photos: Vec<_> = (0..20)
            .map(|i| photo(i, &format!("2024-01-15 11:{:02}:00", i)))
            .collect();

        let a = group_photos(&sessions, &photos);
        let b = group_photos(&sessions, &photos);
        let render = |gs: &[PhotoGroup]| {
            gs.iter()
                .map(|g| {
                    (
                        g.session.as_ref().map(|s| s.id),
                        g.photos.iter().map(|p| p.id).collect::<Vec<_>>(),
                    )
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(render(&a), render(&b));
    }

    #[test]
    fn test_unsorted_photo_input_still_orders_within_groups() {
        let sessions = vec![session(1, WORLD_A, "2024-01-15 10:00:00")];
        let photos = vec![
            photo(2, "2024-01-15 11:00:00"),
            photo(1, "2024-01-15 10:30:00"),
        ];

        let groups = group_photos(&sessions, &photos);
        assert_eq!(taken_times(&groups[0]), vec!["10:30", "11:00"]);
    }
}
