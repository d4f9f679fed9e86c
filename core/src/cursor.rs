use crate::hit::Group;
use crate::hit::Hit;

/// Two-dimensional navigation position over a grouped result list: the
/// active group and the active item within it. Replaced wholesale on every
/// transition; never partially mutated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cursor {
    pub group: usize,
    pub item: usize,
}

impl Cursor {
    pub fn new(group: usize, item: usize) -> Self {
        Self { group, item }
    }

    pub fn reset() -> Self {
        Self::default()
    }
}

/// Outcome of an upward move. Leaving the top of the list is not a cursor
/// position: the consumer must redirect focus to the text input and reset
/// the cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveUp {
    Moved(Cursor),
    FocusInput,
}

/// Advances the cursor one item, descending into the next group at a group
/// boundary and wrapping to (0,0) from the last item of the last group.
pub fn move_down(groups: &[Group], cursor: Cursor) -> Cursor {
    let Some(group) = groups.get(cursor.group) else {
        debug_assert!(false, "move_down on empty or out-of-range groups");
        return Cursor::reset();
    };
    let is_last_item = cursor.item + 1 >= group.len();
    if !is_last_item {
        Cursor::new(cursor.group, cursor.item + 1)
    } else if cursor.group + 1 < groups.len() {
        Cursor::new(cursor.group + 1, 0)
    } else {
        Cursor::reset()
    }
}

/// Retreats the cursor one item, entering the previous group at its last
/// item. From the first item of the first group the move leaves the list
/// entirely and yields [`MoveUp::FocusInput`].
pub fn move_up(groups: &[Group], cursor: Cursor) -> MoveUp {
    if cursor.item > 0 {
        return MoveUp::Moved(Cursor::new(cursor.group, cursor.item - 1));
    }
    match cursor.group.checked_sub(1).and_then(|g| groups.get(g)) {
        Some(previous) => MoveUp::Moved(Cursor::new(
            cursor.group - 1,
            previous.len().saturating_sub(1),
        )),
        None => MoveUp::FocusInput,
    }
}

/// Resolves the cursor to its hit. `None` when the groups are empty or the
/// cursor is out of range; callers should never render a navigable list in
/// that state, so the debug build asserts.
pub fn selected<'a>(groups: &'a [Group], cursor: Cursor) -> Option<&'a Hit> {
    let hit = groups.get(cursor.group)?.items.get(cursor.item);
    debug_assert!(hit.is_some(), "cursor {cursor:?} out of item range");
    hit
}
