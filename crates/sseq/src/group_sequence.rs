use std::collections::BTreeMap;

use abelian::AbelianGroup;
use plocal::matrix::Matrix;

use crate::SseqError;

/// The successive subgroups (or quotients) of one group of the spectral sequence, page by page.
///
/// Each entry holds the group at that page and the map relating it to the group at the first
/// page. Entries are only stored on pages where the group changed; a lookup returns the last
/// entry at or before the requested page. Pages after `current` are unknown until the sequence is
/// marked done, after which every later page equals the last entry.
#[derive(Clone, Debug)]
pub struct GroupSequence {
    entries: BTreeMap<u32, (AbelianGroup, Matrix)>,
    min_page: u32,
    current: u32,
    done: bool,
}

impl GroupSequence {
    /// A sequence starting at `min_page` with `group`, related to itself by the identity.
    pub fn new(min_page: u32, group: AbelianGroup) -> Self {
        let identity = Matrix::identity(group.rank());
        Self {
            entries: BTreeMap::from([(min_page, (group, identity))]),
            min_page,
            current: min_page,
            done: false,
        }
    }

    /// The last page whose entry is known.
    pub fn current_page(&self) -> u32 {
        self.current
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn get(&self, page: u32) -> Result<&(AbelianGroup, Matrix), SseqError> {
        if page < self.min_page {
            return Err(SseqError::IndexBelowMinimum {
                page,
                min: self.min_page,
            });
        }
        if page > self.current && !self.done {
            return Err(SseqError::IndexNotYetSet {
                page,
                current: self.current,
            });
        }
        Ok(self
            .entries
            .range(..=page)
            .next_back()
            .map(|(_, entry)| entry)
            .unwrap_or_else(|| unreachable!("the first page is always present")))
    }

    /// Record a new group at `page`, which must be past the current page. A finished sequence
    /// accepts no further pages.
    pub fn append(
        &mut self,
        page: u32,
        group: AbelianGroup,
        map: Matrix,
    ) -> Result<(), SseqError> {
        if page <= self.current || self.done {
            return Err(SseqError::AlreadySet { page });
        }
        self.entries.insert(page, (group, map));
        self.current = page;
        Ok(())
    }

    /// Advance to the next page without changing the group.
    pub fn inc(&mut self) -> Result<(), SseqError> {
        if self.done {
            return Err(SseqError::AlreadySet {
                page: self.current + 1,
            });
        }
        self.current += 1;
        Ok(())
    }

    /// Declare that the group never changes again.
    pub fn finish(&mut self) {
        self.done = true;
    }
}
