use crate::cache::store::StoreError;
use crate::cache::{Cache, FolderStateMap};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FolderStates {
    states: FolderStateMap,
}

impl FolderStates {
    pub fn load(cache: &Cache) -> Self {
        Self {
            states: cache.load_folder_states(),
        }
    }

    pub fn is_expanded(&self, folder_path: &str) -> bool {
        self.states.get(folder_path).copied().unwrap_or(true)
    }

    pub fn toggle(&mut self, folder_path: &str, cache: &mut Cache) -> Result<bool, StoreError> {
        let expanded = !self.is_expanded(folder_path);
        self.states.insert(folder_path.to_string(), expanded);
        cache.save_folder_states(&self.states)?;
        Ok(expanded)
    }

    pub fn reset(&mut self, cache: &mut Cache) -> Result<(), StoreError> {
        self.states.clear();
        cache.clear_folder_states()
    }
}
