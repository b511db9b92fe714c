use std::collections::HashSet;

/// Hands out node ids that are unique within one tree build.
///
/// The first request for a base id gets it verbatim. Repeats get a `~{n}`
/// suffix (`tag-pets`, `tag-pets~1`, `tag-pets~2`).
#[derive(Debug, Default)]
pub(crate) struct IdAllocator {
    used: HashSet<String>,
}

impl IdAllocator {
    pub(crate) fn allocate(&mut self, base: String) -> String {
        if self.used.insert(base.clone()) {
            return base;
        }

        let mut n = 1;
        loop {
            let candidate = format!("{}~{}", base, n);
            if self.used.insert(candidate.clone()) {
                tracing::debug!("Disambiguated duplicate outline id {} as {}", base, candidate);
                return candidate;
            }
            n += 1;
        }
    }
}
