use leptos::*;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header>
            <div class="header-left">
                <a href="/" class="logo">"IMAGEDROP"</a>
                <span class="badge">"Blobstore → GCS"</span>
            </div>
        </header>
    }
}
