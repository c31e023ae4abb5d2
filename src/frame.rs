use crate::audio::SharedSequencer;
use crate::camera::OrbitCamera;
use crate::core::{
    ParamChange, ParamEffect, ParticleFieldBuilder, SceneParameters, ShaderParameterFeed,
};
use crate::dom;
use crate::overlay;
use crate::render;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Owns the scene for one session: parameters, installed batches, shading
/// feed, camera and the renderer. Driven by `requestAnimationFrame`.
pub struct SceneComposer<'a> {
    params: SceneParameters,
    builder: ParticleFieldBuilder,
    feed: ShaderParameterFeed,
    camera: OrbitCamera,
    gpu: Option<render::GpuState<'a>>,
    canvas: web::HtmlCanvasElement,
    sequencer: SharedSequencer,
    last_instant: Instant,
    shown_playing: Option<bool>,
}

impl<'a> SceneComposer<'a> {
    pub fn new(
        params: SceneParameters,
        gpu: Option<render::GpuState<'a>>,
        canvas: web::HtmlCanvasElement,
        sequencer: SharedSequencer,
    ) -> Self {
        let mut composer = Self {
            feed: ShaderParameterFeed::new(&params),
            params,
            builder: ParticleFieldBuilder::new(),
            camera: OrbitCamera::default(),
            gpu,
            canvas,
            sequencer,
            last_instant: Instant::now(),
            shown_playing: None,
        };
        composer.rebuild();
        composer
    }

    pub fn params(&self) -> &SceneParameters {
        &self.params
    }

    pub fn sequencer(&self) -> &SharedSequencer {
        &self.sequencer
    }

    /// Apply an edit. Rebuilds complete here, before the next frame renders.
    pub fn apply_change(&mut self, change: ParamChange) {
        match self.params.apply(change) {
            ParamEffect::Rebuild => self.rebuild(),
            ParamEffect::FlameTint => self.feed.set_flame_color(self.params.flame_color),
            // Rotation and glow are read from `params` every frame
            ParamEffect::Rotation | ParamEffect::Glow => {}
        }
        log::info!("[params] applied {:?}", change);
    }

    fn rebuild(&mut self) {
        let (particles, flames) = self.builder.build(&self.params);
        self.feed.set_point_size(self.params.particle_size);
        if let Some(g) = &mut self.gpu {
            g.install_batches(&particles, &flames);
        }
    }

    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt_sec = (now - self.last_instant).as_secs_f32();
        self.last_instant = now;

        let passes = self.sequencer.borrow_mut().pump();
        if passes > 0 {
            log::info!("[audio] melody looped");
        }
        self.sync_music_button();

        self.camera.advance(dt_sec, self.params.rotation_speed);
        let w = self.canvas.width();
        let h = self.canvas.height();
        self.camera.set_viewport(w, h);

        if let Some(g) = &mut self.gpu {
            g.resize_if_needed(w, h);
            let shading = self.feed.uniforms_at(now);
            if let Err(e) = g.render(&self.camera, &shading, self.params.bloom_strength) {
                log::error!("render error: {:?}", e);
            }
        }
    }

    fn sync_music_button(&mut self) {
        let playing = self.sequencer.borrow().is_playing();
        if self.shown_playing != Some(playing) {
            if let Some(doc) = dom::window_document() {
                overlay::set_music_playing(&doc, playing);
            }
            self.shown_playing = Some(playing);
        }
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

pub fn start_loop(composer: Rc<RefCell<SceneComposer<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        composer.borrow_mut().frame();
        if let (Some(w), Some(cb)) = (web::window(), tick_clone.borrow().as_ref()) {
            _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut()>));
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
