mod components;
mod error;
mod extract;
mod game;
mod geometry;
mod model;
mod numbering;
mod overlay;
mod state;
mod storage;
mod util;

use components::app::App;

fn main() {
    yew::Renderer::<App>::new().render();
}
