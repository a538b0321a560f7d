// Selectable character list shown by the host

use log::{debug, error};

/// One entry of the host's character selection list
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectableCharacter {
    pub name: String,
    pub prefab: Option<String>,
    pub assist_prefab: Option<String>,
    pub bg_prefab: Option<String>,
}

impl SelectableCharacter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_prefab(mut self, prefab: impl Into<String>) -> Self {
        self.prefab = Some(prefab.into());
        self
    }

    pub fn with_assist_prefab(mut self, prefab: impl Into<String>) -> Self {
        self.assist_prefab = Some(prefab.into());
        self
    }

    pub fn with_bg_prefab(mut self, prefab: impl Into<String>) -> Self {
        self.bg_prefab = Some(prefab.into());
        self
    }
}

/// First entry whose lowercase name contains `hint`
pub fn find_baseline<'a>(
    list: &'a [SelectableCharacter],
    hint: &str,
) -> Option<&'a SelectableCharacter> {
    let hint = hint.to_lowercase();
    list.iter().find(|c| c.name.to_lowercase().contains(&hint))
}

/// Append custom characters to a selection list
///
/// Each new entry borrows the baseline's prefab and assist prefab and has no
/// background. Names already in the list are left alone. Returns how many
/// entries were added.
pub fn append_custom_characters<S: AsRef<str>>(
    list: &mut Vec<SelectableCharacter>,
    names: &[S],
    baseline_hint: &str,
) -> usize {
    let Some(baseline) = find_baseline(list, baseline_hint).cloned() else {
        error!(
            "Could not add custom characters: no baseline character matching '{}'",
            baseline_hint
        );
        return 0;
    };

    let mut added = 0;
    for name in names {
        let name = name.as_ref();
        if list.iter().any(|c| c.name == name) {
            debug!("'{}' is already selectable", name);
            continue;
        }

        list.push(SelectableCharacter {
            name: name.to_string(),
            prefab: baseline.prefab.clone(),
            assist_prefab: baseline.assist_prefab.clone(),
            bg_prefab: None,
        });
        added += 1;
    }
    added
}
