use leptos::*;

#[component]
pub fn Footer() -> impl IntoView {
    view! {
        <footer>
            <p>"imagedrop · blob store to bucket migration demo"</p>
        </footer>
    }
}
