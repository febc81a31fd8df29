use std::{fs, io::Write, path::Path};
use chrono::{Local, format::{DelayedFormat, StrftimeItems}};
use crate::{
    display::{Colormap, Contrast, DisplaySettings},
    filter::{FilterChain, filter_option::{FilterParams, Parceable}},
    my_err::MyError,
    subwindow::Subwindow,
    utils::{self, LinesIter, TextBlocksIter},
};

const BLOCK_SEPARATOR: &str = "||";
const SETTINGS_HEADER: &str = "Display";
pub const PROJECT_EXT: &str = "mdp";


/// Saved configuration of one subwindow: its display settings block
/// followed by one block per filter step.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub settings: DisplaySettings,
    pub chain: FilterChain,
}

impl Project {
    pub fn of(subwindow: &Subwindow) -> Self {
        Project {
            settings: subwindow.settings().clone(),
            chain: subwindow.chain().clone(),
        }
    }

    pub fn apply_to(self, subwindow: &mut Subwindow) {
        subwindow.set_configuration(self.settings, self.chain);
    }

    pub fn content_to_string(&self) -> String {
        let mut blocks = Vec::<String>::with_capacity(self.chain.len() + 1);
        blocks.push(settings_to_string(&self.settings));

        for (kind, params) in self.chain.steps() {
            let mut block = kind.name().to_string();
            if !params.is_empty() {
                block.push('\n');
                block.push_str(&params.content_to_string());
            }
            blocks.push(block);
        }

        let mut content = blocks.join(&format!("\n{}\n", BLOCK_SEPARATOR));
        content.push('\n');
        content
    }

    /// All or nothing: any malformed block fails the whole load.
    pub fn try_from_string(text: &str) -> Result<Self, MyError> {
        let mut blocks = TextBlocksIter::new(text, BLOCK_SEPARATOR);

        let settings_block = blocks.next()
            .ok_or_else(|| MyError::format("project is empty".to_string()))?;
        let settings = settings_from_string(settings_block)?;

        let mut chain = FilterChain::new();
        for (step_num, block) in blocks.enumerate() {
            let mut lines = LinesIter::new(block);
            let name = lines.next_or_empty();
            let params = params_from_lines(lines)?;

            chain.append(name, &params).map_err(|err| MyError::format(
                format!("step {} '{}': {}", step_num, name, err)))?;
        }

        Ok(Project { settings, chain })
    }

    pub fn save(&self, path: &Path) -> Result<(), MyError> {
        let mut file = fs::File::create(path)?;
        file.write_all(self.content_to_string().as_bytes())?;
        file.sync_all()?;

        log::info!("project with {} steps saved to '{}'", self.chain.len(), path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, MyError> {
        let text = fs::read_to_string(path)?;
        let project = Self::try_from_string(&text)?;

        log::info!("project with {} steps loaded from '{}'", project.chain.len(), path.display());
        Ok(project)
    }
}

fn settings_to_string(settings: &DisplaySettings) -> String {
    let mut lines = vec![
        SETTINGS_HEADER.to_string(),
        format!("colormap: {}", settings.colormap().name()),
    ];

    match settings.contrast() {
        Contrast::Auto => lines.push("contrast: auto".to_string()),
        Contrast::Manual { lower, upper } => {
            lines.push("contrast: manual".to_string());
            lines.push(format!("lower: {}", lower.content_to_string()));
            lines.push(format!("upper: {}", upper.content_to_string()));
        }
    }

    lines.push(format!("dc_offset: {}", settings.dc_offset().content_to_string()));
    if let Some(aspect) = settings.aspect() {
        lines.push(format!("aspect: {}", aspect.content_to_string()));
    }

    lines.join("\n")
}

fn params_from_lines(lines: LinesIter) -> Result<FilterParams, MyError> {
    let mut params = FilterParams::new();
    for line in lines {
        let (key, value) = utils::split_key_value(line)
            .ok_or_else(|| MyError::format(format!("'{}' is not a 'key: value' line", line)))?;
        params.insert(key, value);
    }
    Ok(params)
}

fn settings_from_string(block: &str) -> Result<DisplaySettings, MyError> {
    let mut lines = LinesIter::new(block);
    let header = lines.next_or_empty();
    if header != SETTINGS_HEADER {
        return Err(MyError::format(format!("expected '{}' block first, got '{}'", SETTINGS_HEADER, header)));
    }

    let values = params_from_lines(lines)?;
    let get_f64 = |key: &str| -> Result<Option<f64>, MyError> {
        match values.get(key) {
            Some(s) => f64::try_from_string(s)
                .map(Some)
                .map_err(|msg| MyError::format(format!("'{}': {}", key, msg))),
            None => Ok(None),
        }
    };

    for (key, _) in values.iter() {
        if !["colormap", "contrast", "lower", "upper", "dc_offset", "aspect"].contains(&key) {
            return Err(MyError::format(format!("unknown display setting '{}'", key)));
        }
    }

    let mut settings = DisplaySettings::new();

    if let Some(name) = values.get("colormap") {
        let colormap = Colormap::try_from_name(name)
            .ok_or_else(|| MyError::format(format!("unknown colormap '{}'", name)))?;
        settings.set_colormap(colormap);
    }

    match values.get("contrast").unwrap_or("auto") {
        "auto" => settings.set_auto_contrast(),
        "manual" => {
            let lower = get_f64("lower")?.ok_or_else(|| MyError::format("manual contrast needs 'lower'".to_string()))?;
            let upper = get_f64("upper")?.ok_or_else(|| MyError::format("manual contrast needs 'upper'".to_string()))?;
            settings.set_contrast(lower, upper).map_err(|err| MyError::format(err.to_string()))?;
        },
        other => return Err(MyError::format(format!("contrast must be 'auto' or 'manual', got '{}'", other))),
    }

    if let Some(dc_offset) = get_f64("dc_offset")? {
        settings.set_dc_offset(dc_offset).map_err(|err| MyError::format(err.to_string()))?;
    }
    settings.set_aspect(get_f64("aspect")?).map_err(|err| MyError::format(err.to_string()))?;

    Ok(settings)
}

pub fn default_project_name() -> String {
    let formatter: DelayedFormat<StrftimeItems> = Local::now().format("Project %d-%m(%b)-%Y_%a_%_H.%M.%S");
    format!("{}.{}", formatter, PROJECT_EXT)
}

pub fn default_export_name(subwindow_title: &str) -> String {
    let formatter: DelayedFormat<StrftimeItems> = Local::now().format("%d-%m(%b)-%Y_%a_%_H.%M.%S");
    format!("{} {}.jpg", subwindow_title, formatter)
}


#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Project {
        let mut settings = DisplaySettings::new();
        settings.set_colormap(Colormap::GistRainbow);
        settings.set_contrast(-1.5, 4.0).unwrap();
        settings.set_dc_offset(0.25).unwrap();

        let mut chain = FilterChain::new();
        chain.append("Low Pass", &FilterParams::new().with("window", "kaiser").with("shape", 8.6)).unwrap();
        chain.append("Log Transform", &FilterParams::new()).unwrap();
        chain.append("Notch", &FilterParams::new().with("center_row", 4).with("center_col", 2)).unwrap();

        Project { settings, chain }
    }

    #[test]
    fn text_round_trip() {
        let project = sample();
        let text = project.content_to_string();
        assert!(text.starts_with("Display\ncolormap: gist_rainbow\n"));
        assert_eq!(Project::try_from_string(&text).unwrap(), project);
    }

    #[test]
    fn settings_only() {
        let project = Project::try_from_string("Display\ncolormap: hot\n").unwrap();
        assert_eq!(project.settings.colormap(), Colormap::Hot);
        assert_eq!(project.settings.contrast(), Contrast::Auto);
        assert!(project.chain.is_empty());
    }

    #[test]
    fn bad_step_fails_whole_load() {
        let text = "Display\n||\nLog Transform\n||\nSharpen\nradius: 3\n";
        assert!(matches!(Project::try_from_string(text), Err(MyError::Format { .. })));
    }

    #[test]
    fn bad_settings_fail() {
        assert!(Project::try_from_string("").is_err());
        assert!(Project::try_from_string("Low Pass\n").is_err());
        assert!(Project::try_from_string("Display\ncontrast: manual\nlower: 2\nupper: 1\n").is_err());
        assert!(Project::try_from_string("Display\nbrightness: 2\n").is_err());
    }

    #[test]
    fn default_names() {
        assert!(default_project_name().starts_with("Project "));
        assert!(default_project_name().ends_with(".mdp"));
        assert!(default_export_name("Magnitude").ends_with(".jpg"));
    }
}
