//! Icon resolution through a real icon theme laid out in a temporary directory.

mod common;

use common::{Recorder, config, session};
use image::{Rgba, RgbaImage};

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::rc::Rc;
use tempfile::tempdir;

const INDEX_THEME: &str = "[Icon Theme]
Name=Test
Directories=16x16/actions,16x16/mimetypes,scalable/places

[16x16/actions]
Size=16
Type=Fixed

[16x16/mimetypes]
Size=16
Type=Fixed

[scalable/places]
Size=48
MinSize=8
MaxSize=512
Type=Scalable
";

const FOLDER_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="48" height="48"><rect width="48" height="48" fill="#3465a4"/></svg>"##;

/// An icon base directory with a "Test" theme providing go-up, text-x-generic and folder.
fn icon_theme(base: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let theme = base.join("Test");
    fs::create_dir_all(theme.join("16x16/actions"))?;
    fs::create_dir_all(theme.join("16x16/mimetypes"))?;
    fs::create_dir_all(theme.join("scalable/places"))?;
    fs::write(theme.join("index.theme"), INDEX_THEME)?;

    RgbaImage::from_pixel(16, 16, Rgba([0, 255, 0, 255])).save(theme.join("16x16/actions/go-up.png"))?;
    RgbaImage::from_pixel(16, 16, Rgba([255, 255, 255, 255]))
        .save(theme.join("16x16/mimetypes/text-x-generic.png"))?;
    fs::write(theme.join("scalable/places/folder.svg"), FOLDER_SVG)?;
    Ok(())
}

#[test]
fn entries_resolve_through_the_theme() -> Result<(), Box<dyn std::error::Error>> {
    let icons = tempdir()?;
    icon_theme(icons.path())?;

    let dir = tempdir()?;
    fs::create_dir(dir.path().join("photos"))?;
    let mut notes = File::create(dir.path().join("notes.txt"))?;
    writeln!(notes, "hello")?;
    let mut blob = File::create(dir.path().join("blob.bin"))?;
    blob.write_all(&[0, 1, 2, 3])?;

    let recorder = Recorder::default();
    let cfg = config(dir.path(), "", "themes = [\"Test\"]", "")?;
    let mut s = session(&cfg, vec![icons.path().to_path_buf()], &recorder)?;
    // .., photos, blob.bin, notes.txt

    let up = s.icon(0, 16).ok_or("no icon for ..")?;
    assert_eq!(up.get_pixel(0, 0).0, [0, 255, 0, 255]);

    let folder = s.icon(1, 32).ok_or("no folder icon")?;
    assert_eq!(folder.dimensions(), (32, 32));

    let text = s.icon(3, 16).ok_or("no generic text icon")?;
    assert_eq!(text.dimensions(), (16, 16));

    assert!(s.icon(2, 16).is_none());
    Ok(())
}

#[test]
fn icons_are_shared_across_sizes() -> Result<(), Box<dyn std::error::Error>> {
    let icons = tempdir()?;
    icon_theme(icons.path())?;

    let dir = tempdir()?;
    fs::create_dir(dir.path().join("one"))?;
    fs::create_dir(dir.path().join("two"))?;

    let recorder = Recorder::default();
    let cfg = config(dir.path(), "", "themes = [\"Test\"]", "")?;
    let mut s = session(&cfg, vec![icons.path().to_path_buf()], &recorder)?;

    let small = s.icon(1, 16).ok_or("no icon")?;
    let large = s.icon(2, 256).ok_or("no icon")?;
    assert!(Rc::ptr_eq(&small, &large));
    assert_eq!(large.dimensions(), (16, 16));
    Ok(())
}

#[test]
fn icon_index_follows_the_custom_command_target() -> Result<(), Box<dyn std::error::Error>> {
    let icons = tempdir()?;
    icon_theme(icons.path())?;

    let dir = tempdir()?;
    File::create(dir.path().join("todo.txt"))?;

    let recorder = Recorder::default();
    let cfg = config(dir.path(), "", "themes = [\"Test\"]", "")?;
    let mut s = session(&cfg, vec![icons.path().to_path_buf()], &recorder)?;

    s.handle_event(fbrowse::app::Event::ShiftSelect(1));
    let icon = s.icon(0, 16).ok_or("no icon for the target")?;
    assert_eq!(icon.get_pixel(0, 0).0, [255, 255, 255, 255]);
    Ok(())
}

#[test]
fn disabled_icons_resolve_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let icons = tempdir()?;
    icon_theme(icons.path())?;
    let dir = tempdir()?;

    let recorder = Recorder::default();
    let cfg = config(dir.path(), "", "icons = false\nthemes = [\"Test\"]", "")?;
    let mut s = session(&cfg, vec![icons.path().to_path_buf()], &recorder)?;
    assert!(s.icon(0, 16).is_none());
    Ok(())
}
