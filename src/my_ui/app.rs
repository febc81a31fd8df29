use std::{path::PathBuf, sync::{Arc, mpsc}, thread};
use fltk::{app, dialog, enums::Shortcut, menu, prelude::*, window};
use crate::{
    display::{Colormap, ColormapRegistry},
    filter::{FilterKind, filter_option::FilterParams},
    img::{ImageBuffer, import},
    my_err::MyError,
    processing::{RecomputeWorker, WorkerMsg},
    project::{self, Project},
    subwindow::Subwindow,
    utils::{self, LinesIter},
};
use super::canvas::RenderCanvas;

pub const WIN_WIDTH: i32 = 1040;
pub const WIN_HEIGHT: i32 = 580;
const MENU_HEIGHT: i32 = 30;
const PADDING: i32 = 10;

/// Titles and colormaps of the subwindows opened for every image.
const VIEWS: [(&str, Colormap); 2] = [("Magnitude", Colormap::Gray), ("Rainbow", Colormap::GistRainbow)];

#[derive(Debug, Clone, Copy)]
pub enum Msg {
    ImportImage,
    SaveProject { sw: usize },
    LoadProject { sw: usize },
    ExportImage { sw: usize },
    SetColormap { sw: usize, colormap: Colormap },
    SetAutoContrast { sw: usize },
    SetContrast { sw: usize },
    SetDcOffset { sw: usize },
    AddFilter { sw: usize, kind: FilterKind },
    RemoveLastFilter { sw: usize },
    ClearFilters { sw: usize },
    Halt,
    WorkerUpdate,
}


pub fn create_app(image: ImageBuffer) -> Result<(), MyError> {
    let app = app::App::default();
    let (sender, receiver) = app::channel::<Msg>();

    let mut wind = window::Window::default()
        .with_size(WIN_WIDTH, WIN_HEIGHT)
        .center_screen()
        .with_label("MRI display");

    let mut menu_bar = menu::MenuBar::new(0, 0, WIN_WIDTH, MENU_HEIGHT, "");
    fill_menu(&mut menu_bar, sender);

    let canvas_w = (WIN_WIDTH - PADDING * 3) / 2;
    let canvas_h = WIN_HEIGHT - MENU_HEIGHT - PADDING * 2;
    let mut canvases: Vec<RenderCanvas> = VIEWS.iter()
        .enumerate()
        .map(|(i, (title, _))| RenderCanvas::new(
            PADDING + i as i32 * (canvas_w + PADDING), MENU_HEIGHT + PADDING, canvas_w, canvas_h, title))
        .collect();

    wind.end();
    wind.make_resizable(true);
    wind.show();

    let colormaps = Arc::new(ColormapRegistry::load_embedded()?);
    let mut subwindows = open_subwindows(Arc::new(image), &colormaps, 0)?;
    let mut next_id = subwindows.len();

    // worker results are forwarded into the fltk channel so `app.wait()` wakes up
    let (tx_worker, rx_worker) = mpsc::channel::<WorkerMsg>();
    let (tx_ui, rx_ui) = mpsc::channel::<WorkerMsg>();
    let worker = RecomputeWorker::new(tx_worker)?;
    thread::Builder::new()
        .name("Worker relay".to_string())
        .spawn(move || {
            for msg in rx_worker {
                if tx_ui.send(msg).is_err() {
                    break;
                }
                sender.send(Msg::WorkerUpdate);
            }
        })?;

    for (sw, canvas) in subwindows.iter().zip(canvases.iter_mut()) {
        show_renderable(sw, canvas)?;
    }

    while app.wait() {
        if let Some(msg) = receiver.recv() {
            let result = match msg {
                Msg::WorkerUpdate => {
                    handle_worker_msgs(&rx_ui, &mut subwindows, &mut canvases);
                    for (sw, canvas) in subwindows.iter_mut().zip(canvases.iter_mut()) {
                        schedule(sw, canvas, &worker);
                    }
                    Ok(())
                },
                Msg::Halt => {
                    worker.halt();
                    Ok(())
                },
                Msg::ImportImage => import_image(&colormaps, next_id).and_then(|opened| {
                    if let Some(opened) = opened {
                        worker.halt();
                        next_id += opened.len();
                        subwindows = opened;
                        for (sw, canvas) in subwindows.iter().zip(canvases.iter_mut()) {
                            show_renderable(sw, canvas)?;
                        }
                    }
                    Ok(())
                }),
                other => {
                    let sw = target_of(other);
                    handle_subwindow_msg(other, &mut subwindows[sw], &canvases[sw])
                        .map(|_| schedule(&mut subwindows[sw], &mut canvases[sw], &worker))
                },
            };

            if let Err(err) = result {
                log::warn!("{}", err);
                dialog::alert(WIN_WIDTH / 2, WIN_HEIGHT / 2, &err.get_message());
            }
        }
    }

    Ok(())
}

fn fill_menu(menu_bar: &mut menu::MenuBar, sender: app::Sender<Msg>) {
    menu_bar.add_emit("&File/Import text grid...", Shortcut::Ctrl | 'o', menu::MenuFlag::Normal, sender, Msg::ImportImage);
    menu_bar.add_emit("&File/Halt processing", Shortcut::None, menu::MenuFlag::Normal, sender, Msg::Halt);

    for (sw, (title, _)) in VIEWS.iter().enumerate() {
        let add = |menu_bar: &mut menu::MenuBar, path: &str, msg: Msg| {
            menu_bar.add_emit(&format!("{}/{}", title, path), Shortcut::None, menu::MenuFlag::Normal, sender, msg);
        };

        add(menu_bar, "Project/Save...", Msg::SaveProject { sw });
        add(menu_bar, "Project/Load...", Msg::LoadProject { sw });
        add(menu_bar, "Export JPEG...", Msg::ExportImage { sw });

        for colormap in Colormap::ALL.iter() {
            add(menu_bar, &format!("Colormap/{}", colormap.name()), Msg::SetColormap { sw, colormap: *colormap });
        }

        add(menu_bar, "Contrast/Auto", Msg::SetAutoContrast { sw });
        add(menu_bar, "Contrast/Manual...", Msg::SetContrast { sw });
        add(menu_bar, "DC offset...", Msg::SetDcOffset { sw });

        for kind in FilterKind::ALL.iter() {
            add(menu_bar, &format!("Filters/Add/{}...", kind.name()), Msg::AddFilter { sw, kind: *kind });
        }
        add(menu_bar, "Filters/Remove last", Msg::RemoveLastFilter { sw });
        add(menu_bar, "Filters/Clear", Msg::ClearFilters { sw });
    }
}

fn target_of(msg: Msg) -> usize {
    match msg {
        Msg::SaveProject { sw } | Msg::LoadProject { sw } | Msg::ExportImage { sw }
        | Msg::SetColormap { sw, .. } | Msg::SetAutoContrast { sw } | Msg::SetContrast { sw }
        | Msg::SetDcOffset { sw } | Msg::AddFilter { sw, .. } | Msg::RemoveLastFilter { sw }
        | Msg::ClearFilters { sw } => sw,
        Msg::ImportImage | Msg::Halt | Msg::WorkerUpdate => unreachable!("{:?} has no subwindow", msg),
    }
}

/// One subwindow per view, with ids starting at `first_id` so results of
/// jobs sent out for a previous image can't be taken for theirs.
fn open_subwindows(image: Arc<ImageBuffer>, colormaps: &Arc<ColormapRegistry>, first_id: usize) -> Result<Vec<Subwindow>, MyError> {
    let mut subwindows = Vec::with_capacity(VIEWS.len());
    for (i, (title, colormap)) in VIEWS.iter().enumerate() {
        let mut sw = Subwindow::new(first_id + i, title, Arc::clone(&image), Arc::clone(colormaps))?;
        sw.set_colormap(*colormap);
        sw.recompute()?;
        subwindows.push(sw);
    }
    Ok(subwindows)
}

fn import_image(colormaps: &Arc<ColormapRegistry>, first_id: usize) -> Result<Option<Vec<Subwindow>>, MyError> {
    let path = match choose_file(dialog::FileDialogType::BrowseFile, "Import text grid", "*.txt", "") {
        Some(path) => path,
        None => return Ok(None),
    };
    let image = import::import_text_grid(&path)?;
    open_subwindows(Arc::new(image), colormaps, first_id).map(Some)
}

fn handle_subwindow_msg(msg: Msg, sw: &mut Subwindow, canvas: &RenderCanvas) -> Result<(), MyError> {
    let (cx, cy) = canvas.center();

    match msg {
        Msg::SetColormap { colormap, .. } => sw.set_colormap(colormap),
        Msg::SetAutoContrast { .. } => sw.set_auto_contrast(),
        Msg::SetContrast { .. } => {
            let (lower, upper) = sw.last_good().contrast_bounds();
            if let Some(text) = dialog::input(cx, cy, "Contrast bounds 'lower upper':", &format!("{} {}", lower, upper)) {
                let mut words = utils::WordsIter::new(&text, "");
                let lower = parse_number(words.next_or_empty())?;
                let upper = parse_number(words.next_or_empty())?;
                sw.set_contrast(lower, upper)?;
            }
        },
        Msg::SetDcOffset { .. } => {
            if let Some(text) = dialog::input(cx, cy, "DC offset:", &sw.settings().dc_offset().to_string()) {
                sw.set_dc_offset(parse_number(&text)?)?;
            }
        },
        Msg::AddFilter { kind, .. } => {
            let prompt = format!("{} parameters, 'key: value' separated by ';' (empty for defaults):", kind.name());
            if let Some(text) = dialog::input(cx, cy, &prompt, "") {
                let params = parse_params(&text)?;
                sw.append_filter(kind.name(), &params)?;
            }
        },
        Msg::RemoveLastFilter { .. } => {
            if !sw.chain().is_empty() {
                sw.remove_filter(sw.chain().len() - 1)?;
            }
        },
        Msg::ClearFilters { .. } => sw.clear_filters(),
        Msg::SaveProject { .. } => {
            if let Some(path) = choose_file(dialog::FileDialogType::BrowseSaveFile, "Save project",
                &format!("*.{}", project::PROJECT_EXT), &project::default_project_name())
            {
                Project::of(sw).save(&path)?;
            }
        },
        Msg::LoadProject { .. } => {
            if let Some(path) = choose_file(dialog::FileDialogType::BrowseFile, "Load project",
                &format!("*.{}", project::PROJECT_EXT), "")
            {
                Project::load(&path)?.apply_to(sw);
            }
        },
        Msg::ExportImage { .. } => {
            if let Some(path) = choose_file(dialog::FileDialogType::BrowseSaveFile, "Export JPEG",
                "*.jpg", &project::default_export_name(sw.title()))
            {
                let path = path.to_str()
                    .ok_or_else(|| MyError::new("The chosen path is not valid UTF-8".to_string()))?;
                sw.renderable()?.try_save(path)?;
            }
        },
        Msg::ImportImage | Msg::Halt | Msg::WorkerUpdate => {},
    }

    Ok(())
}

/// Sends a stale subwindow to the worker, unless one of its jobs is still out;
/// that job's result will be dropped as obsolete and this one scheduled then.
fn schedule(sw: &mut Subwindow, canvas: &mut RenderCanvas, worker: &RecomputeWorker) {
    if !sw.needs_recompute() {
        return;
    }
    match sw.begin_recompute() {
        Ok(job) => {
            worker.put_job(job);
            canvas.set_status("Recomputing...");
        },
        Err(err) => log::warn!("subwindow {}: {}", sw.id(), err),
    }
}

fn handle_worker_msgs(rx_ui: &mpsc::Receiver<WorkerMsg>, subwindows: &mut [Subwindow], canvases: &mut [RenderCanvas]) {
    while let Ok(msg) = rx_ui.try_recv() {
        match msg {
            WorkerMsg::Progress { subwindow_id, percents } => {
                if let Some(pos) = subwindows.iter().position(|sw| sw.id() == subwindow_id) {
                    canvases[pos].set_status(&format!("Recomputing... {} %", percents));
                }
            },
            WorkerMsg::Completed(done) => {
                let pos = match subwindows.iter().position(|sw| sw.id() == done.subwindow_id) {
                    Some(pos) => pos,
                    None => continue,
                };
                let (sw, canvas) = (&mut subwindows[pos], &mut canvases[pos]);

                let shown = match sw.finish_recompute(done) {
                    Ok(true) => show_renderable(sw, canvas),
                    Ok(false) => Ok(()),
                    Err(err) => Err(err),
                };

                if let Err(err) = shown {
                    canvas.set_status(&format!("{} (showing the last good image)", err));
                    let (cx, cy) = canvas.center();
                    dialog::alert(cx, cy, &err.get_message());
                }
            },
        }
    }
}

fn show_renderable(sw: &Subwindow, canvas: &mut RenderCanvas) -> Result<(), MyError> {
    let renderable = sw.renderable()?;
    canvas.set_renderable(renderable, sw.settings().aspect())?;
    canvas.set_status(&format!("{} | {} | {} steps",
        sw.image().get_description(), sw.settings().get_description(), sw.chain().len()));
    Ok(())
}

fn choose_file(dlg_type: dialog::FileDialogType, title: &str, filter: &str, preset: &str) -> Option<PathBuf> {
    let mut dlg = dialog::FileDialog::new(dlg_type);
    dlg.set_title(title);
    dlg.set_filter(filter);
    if !preset.is_empty() {
        dlg.set_preset_file(preset);
    }
    dlg.show();

    let path = dlg.filename();
    if path.as_os_str().is_empty() {
        None
    } else {
        Some(path)
    }
}

fn parse_number(text: &str) -> Result<f64, MyError> {
    use crate::filter::filter_option::Parceable;
    f64::try_from_string(text).map_err(MyError::new)
}

/// `key: value; key: value` as typed in the filter dialog.
fn parse_params(text: &str) -> Result<FilterParams, MyError> {
    let lines = text.replace(';', "\n");
    let mut params = FilterParams::new();
    for line in LinesIter::new(&lines) {
        let (key, value) = utils::split_key_value(line)
            .ok_or_else(|| MyError::new(format!("'{}' is not 'key: value'", line)))?;
        params.insert(key, value);
    }
    Ok(params)
}
