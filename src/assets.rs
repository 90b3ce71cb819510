use include_dir::{include_dir, Dir};
use serde::de::DeserializeOwned;

use crate::error::AssetError;

/// Word lists, glossaries and the thesaurus shipped inside the binary
pub(crate) static LANG_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/lang");

/// Deserialize one embedded JSON asset, e.g. `easy.json` or `glossary/fr.json`
pub(crate) fn load_json<T: DeserializeOwned>(path: &str) -> Result<T, AssetError> {
    let file = LANG_DIR
        .get_file(path)
        .ok_or_else(|| AssetError::NotFound(path.to_string()))?;

    let contents = file
        .contents_utf8()
        .ok_or_else(|| AssetError::NotUtf8(path.to_string()))?;

    serde_json::from_str(contents).map_err(|source| AssetError::Parse {
        path: path.to_string(),
        source,
    })
}

/// Paths of every embedded JSON file directly under `dir`
pub(crate) fn json_files_in(dir: &str) -> Vec<String> {
    LANG_DIR
        .get_dir(dir)
        .map(|d| {
            d.files()
                .filter(|f| f.path().extension().is_some_and(|ext| ext == "json"))
                .map(|f| f.path().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_load_known_asset() {
        let value: Value = load_json("easy.json").unwrap();
        assert_eq!(value["name"], "easy");
    }

    #[test]
    fn test_load_missing_asset() {
        let result: Result<Value, _> = load_json("nope.json");
        assert!(matches!(result, Err(AssetError::NotFound(p)) if p == "nope.json"));
    }

    #[test]
    fn test_glossary_files_listed() {
        let files = json_files_in("glossary");
        assert!(files.iter().any(|f| f.ends_with("fr.json")));
        assert!(files.iter().any(|f| f.ends_with("es.json")));
    }
}
