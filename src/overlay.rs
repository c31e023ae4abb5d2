use web_sys as web;

const MUSIC_BUTTON_ID: &str = "music-toggle";
const HUD_ID: &str = "hud";

/// Reflect playback state on the play/stop button.
pub fn set_music_playing(document: &web::Document, playing: bool) {
    if let Some(el) = document.get_element_by_id(MUSIC_BUTTON_ID) {
        el.set_text_content(Some(if playing {
            "Stop Music"
        } else {
            "Play Song \u{266B}"
        }));
        let cl = el.class_list();
        _ = if playing {
            cl.add_1("playing")
        } else {
            cl.remove_1("playing")
        };
    }
}

#[inline]
pub fn toggle_hud(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(HUD_ID) {
        _ = el.class_list().toggle("hidden");
    }
}
