use contracts::shared::filters::EmptySelection;
use once_cell::sync::OnceCell;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use super::dataset::{Dataset, DatasetCache};
use super::loader::LoadOptions;

static DATASET_STORE: OnceCell<DatasetStore> = OnceCell::new();

/// Process-wide owner of the dataset cache and the configured source file
pub struct DatasetStore {
    path: PathBuf,
    empty_selection: EmptySelection,
    cache: Mutex<DatasetCache>,
}

impl DatasetStore {
    pub fn new(path: PathBuf, options: LoadOptions, empty_selection: EmptySelection) -> Self {
        Self {
            path,
            empty_selection,
            cache: Mutex::new(DatasetCache::new(options)),
        }
    }

    pub fn empty_selection(&self) -> EmptySelection {
        self.empty_selection
    }

    /// Current dataset, loaded on first use
    pub fn dataset(&self) -> anyhow::Result<Arc<Dataset>> {
        let mut cache = self
            .cache
            .lock()
            .map_err(|_| anyhow::anyhow!("dataset cache lock poisoned"))?;
        Ok(cache.get_or_load(&self.path)?)
    }

    /// Parse the file again and swap it in; on failure the cached dataset stays
    pub fn reload(&self) -> anyhow::Result<Arc<Dataset>> {
        let mut cache = self
            .cache
            .lock()
            .map_err(|_| anyhow::anyhow!("dataset cache lock poisoned"))?;
        let previous = cache.get(&self.path);
        let fresh = match Dataset::load(&self.path, cache.options()) {
            Ok(fresh) => fresh,
            Err(e) => {
                tracing::warn!(
                    "Dataset: reload of {} failed, keeping the loaded data: {}",
                    self.path.display(),
                    e
                );
                return Err(e.into());
            }
        };
        let changed = previous
            .map_or(true, |previous| previous.key().content_hash != fresh.key().content_hash);
        tracing::info!(
            "Dataset: reloaded {} rows from {} (content changed: {})",
            fresh.len(),
            self.path.display(),
            changed
        );
        Ok(cache.insert(fresh))
    }
}

/// Load the dataset once at startup; a parse failure is fatal for the caller
pub fn initialize_dataset(
    path: PathBuf,
    options: LoadOptions,
    empty_selection: EmptySelection,
) -> anyhow::Result<Arc<Dataset>> {
    let store = DatasetStore::new(path, options, empty_selection);
    let dataset = store.dataset()?;
    DATASET_STORE
        .set(store)
        .map_err(|_| anyhow::anyhow!("dataset store is already initialized"))?;
    Ok(dataset)
}

pub fn get_store() -> anyhow::Result<&'static DatasetStore> {
    DATASET_STORE
        .get()
        .ok_or_else(|| anyhow::anyhow!("Dataset store has not been initialized"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "order_id,order_date,customer_city,customer_state,customer_region,customer_segment,category_name,product_name,order_quantity,sales_per_order,profit_per_order,order_item_discount,delivery_status,shipping_type,days_for_shipment_real";
    const ROW_1: &str = "1,15-01-2022,Denver,Colorado,West,Consumer,Office Supplies,Stapler,2,120.5,30.25,0.1,Shipping on time,Standard Class,4";
    const ROW_2: &str = "2,16-01-2022,Austin,Texas,Central,Corporate,Technology,Phone,1,800,-20,0,Late delivery,First Class,5";

    fn store_for(file: &tempfile::NamedTempFile) -> DatasetStore {
        DatasetStore::new(
            file.path().to_path_buf(),
            LoadOptions::default(),
            EmptySelection::NoRestriction,
        )
    }

    #[test]
    fn test_reload_picks_up_new_content() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), format!("{HEADER}\n{ROW_1}")).unwrap();
        let store = store_for(&file);
        assert_eq!(store.dataset().unwrap().len(), 1);

        std::fs::write(file.path(), format!("{HEADER}\n{ROW_1}\n{ROW_2}")).unwrap();
        let reloaded = store.reload().unwrap();

        assert_eq!(reloaded.len(), 2);
        assert!(Arc::ptr_eq(&store.dataset().unwrap(), &reloaded));
    }

    #[test]
    fn test_failed_reload_keeps_loaded_dataset() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), format!("{HEADER}\n{ROW_1}")).unwrap();
        let store = store_for(&file);
        let loaded = store.dataset().unwrap();

        std::fs::write(file.path(), "order_id\n1").unwrap();
        assert!(store.reload().is_err());

        let current = store.dataset().unwrap();
        assert!(Arc::ptr_eq(&current, &loaded));
        assert_eq!(current.len(), 1);
    }

    #[test]
    fn test_store_is_not_initialized_in_tests() {
        let err = get_store().err().unwrap();
        assert_eq!(err.to_string(), "Dataset store has not been initialized");
    }
}
