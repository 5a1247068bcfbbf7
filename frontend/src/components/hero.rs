use leptos::*;

#[component]
pub fn Hero() -> impl IntoView {
    view! {
        <div class="hero">
            <h1>"Upload images"</h1>
            <p class="subtitle">
                "Files go straight to a one-time upload URL. "
                "Stored images show up below, newest first."
            </p>
        </div>
    }
}
