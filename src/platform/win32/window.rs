// ── Main window ───────────────────────────────────────────────────────────────
//
// Hosts the `App` on the UI thread and feeds it menu commands.  The "Recent
// Files" popup is created empty here and handed to the recent-file list, which
// owns its contents from then on.

#![allow(unsafe_code)]

use std::cell::RefCell;

use windows::{
    core::{w, PCWSTR},
    Win32::{
        Foundation::{GetLastError, HINSTANCE, HWND, LPARAM, LRESULT, WPARAM},
        Graphics::Gdi::{GetStockObject, HBRUSH, WHITE_BRUSH},
        System::LibraryLoader::GetModuleHandleW,
        UI::WindowsAndMessaging::{
            AppendMenuW, CreateMenu, CreatePopupMenu, CreateWindowExW, DefWindowProcW,
            DestroyWindow, DispatchMessageW, GetMessageW, LoadCursorW, LoadIconW, MessageBoxW,
            PostQuitMessage, RegisterClassExW, SetMenu, SetWindowTextW, ShowWindow,
            TranslateMessage, CS_HREDRAW, CS_VREDRAW, CW_USEDEFAULT, HMENU, IDC_ARROW,
            IDI_APPLICATION, MB_ICONERROR, MB_OK, MESSAGEBOX_STYLE, MF_POPUP, MF_SEPARATOR,
            MF_STRING, MSG, SW_SHOW, WINDOW_EX_STYLE, WM_CLOSE, WM_COMMAND, WM_DESTROY,
            WNDCLASSEXW, WS_OVERLAPPEDWINDOW,
        },
    },
};

use super::{
    dialogs,
    menu::{load_disk_bitmap, Win32Menu},
    wide,
};
use crate::{
    app::{App, LocalSource},
    doc::DataOpen,
    error::{HexerError, Result},
    settings::AppSettings,
};

const CLASS_NAME: PCWSTR = w!("HexerMainWindow");

// File menu
const IDM_OPEN: u32 = 1001;
const IDM_CLOSE: u32 = 1002;
const IDM_EXIT: u32 = 1003;
// Help menu
const IDM_ABOUT: u32 = 9001;

/// Command id of recent-file item 0.  The whole `settings::MAX_RFL_CAPACITY`
/// range must fit the low word of WM_COMMAND's WPARAM.
const IDM_RFL_FIRST: u32 = 20_000;

struct WindowState {
    app: App<Win32Menu>,
    source: LocalSource,
}

thread_local! {
    static STATE: RefCell<Option<WindowState>> = const { RefCell::new(None) };
}

/// Run `f` against the window state.
///
/// `None` before `run` installs the state, or while a caller further up the
/// stack holds it (a modal loop re-entering `wnd_proc`).  Dialogs pump
/// messages, so they are only ever shown outside this call.
fn with_state<R>(f: impl FnOnce(&mut WindowState) -> R) -> Option<R> {
    STATE.with(|cell| {
        let mut guard = cell.try_borrow_mut().ok()?;
        guard.as_mut().map(f)
    })
}

/// Create the main window and pump messages until it is destroyed.
pub(crate) fn run() -> Result<()> {
    let menus = build_menus()?;
    let hwnd = create_main_window(menus.bar)?;

    let mut app = App::new(AppSettings::load().unwrap_or_default());
    app.attach_recent_menu(Win32Menu::new(menus.recent), IDM_RFL_FIRST, load_disk_bitmap());
    let mut source = LocalSource;
    let restored = app.restore_last_opened(&mut source);
    tracing::info!(restored, "[Window] ready");
    STATE.with(|cell| *cell.borrow_mut() = Some(WindowState { app, source }));

    refresh_title(hwnd);
    // SAFETY: hwnd is the window created above.  The return value is the
    // previous visibility, not an error.
    let _ = unsafe { ShowWindow(hwnd, SW_SHOW) };

    let mut msg = MSG::default();
    loop {
        // SAFETY: `msg` is a valid out-pointer; a null HWND takes messages
        // for every window on this thread.
        match unsafe { GetMessageW(&mut msg, HWND::default(), 0, 0) }.0 {
            -1 => return Err(last_error("GetMessageW")),
            0 => return Ok(()),
            // SAFETY: `msg` was filled by GetMessageW.
            _ => unsafe {
                let _ = TranslateMessage(&msg);
                let _ = DispatchMessageW(&msg);
            },
        }
    }
}

/// Modal error box with no owner.  Used by `main` when `run` fails.
pub(crate) fn show_error_dialog(message: &str) {
    message_box(HWND::default(), message, w!("Hexer"), MB_OK | MB_ICONERROR);
}

fn message_box(owner: HWND, text: &str, caption: PCWSTR, style: MESSAGEBOX_STYLE) {
    let text = wide(text);
    // SAFETY: `text` is null-terminated and outlives the call; `caption` is a
    // `w!` literal.
    let _ = unsafe { MessageBoxW(owner, PCWSTR(text.as_ptr()), caption, style) };
}

struct Menus {
    bar: HMENU,
    recent: HMENU,
}

fn build_menus() -> Result<Menus> {
    // SAFETY: the create calls have no preconditions.  Each popup handle is
    // attached to its parent right after creation, so the bar owns every
    // submenu once the window takes the bar.
    unsafe {
        let recent = CreatePopupMenu()?;

        let file = CreatePopupMenu()?;
        AppendMenuW(file, MF_STRING, IDM_OPEN as usize, w!("&Open File…\tCtrl+O"))?;
        AppendMenuW(file, MF_POPUP, recent.0 as usize, w!("Recent &Files"))?;
        AppendMenuW(file, MF_STRING, IDM_CLOSE as usize, w!("&Close"))?;
        AppendMenuW(file, MF_SEPARATOR, 0, PCWSTR::null())?;
        AppendMenuW(file, MF_STRING, IDM_EXIT as usize, w!("E&xit\tAlt+F4"))?;

        let help = CreatePopupMenu()?;
        AppendMenuW(help, MF_STRING, IDM_ABOUT as usize, w!("&About Hexer…"))?;

        let bar = CreateMenu()?;
        AppendMenuW(bar, MF_POPUP, file.0 as usize, w!("&File"))?;
        AppendMenuW(bar, MF_POPUP, help.0 as usize, w!("&Help"))?;

        Ok(Menus { bar, recent })
    }
}

fn create_main_window(menu_bar: HMENU) -> Result<HWND> {
    // SAFETY: a null module name returns the running executable, which lives
    // as long as the process.
    let hinstance = HINSTANCE(unsafe { GetModuleHandleW(None) }?.0);

    // SAFETY: stock icon, cursor and brush always exist.
    let (icon, cursor, brush) = unsafe {
        (
            LoadIconW(None, IDI_APPLICATION)?,
            LoadCursorW(None, IDC_ARROW)?,
            HBRUSH(GetStockObject(WHITE_BRUSH).0),
        )
    };
    let class = WNDCLASSEXW {
        cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
        style: CS_HREDRAW | CS_VREDRAW,
        lpfnWndProc: Some(wnd_proc),
        hInstance: hinstance,
        hIcon: icon,
        hIconSm: icon,
        hCursor: cursor,
        hbrBackground: brush,
        lpszClassName: CLASS_NAME,
        ..Default::default()
    };
    // SAFETY: `class` is fully initialised and CLASS_NAME is a static literal.
    if unsafe { RegisterClassExW(&class) } == 0 {
        return Err(last_error("RegisterClassExW"));
    }

    // SAFETY: the class was registered above; a null parent makes this a
    // top-level window.
    let hwnd = unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE(0),
            CLASS_NAME,
            w!("Hexer"),
            WS_OVERLAPPEDWINDOW,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            1024,
            700,
            HWND::default(),
            HMENU::default(),
            hinstance,
            None,
        )
    };
    if hwnd == HWND::default() {
        return Err(last_error("CreateWindowExW"));
    }

    // SAFETY: both handles are live.  The window destroys the bar with itself.
    unsafe { SetMenu(hwnd, menu_bar) }?;
    Ok(hwnd)
}

// SAFETY: registered as the class's lpfnWndProc; Windows passes a live hwnd
// for the duration of each call.
unsafe extern "system" fn wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        WM_COMMAND => {
            if on_command(hwnd, (wparam.0 & 0xFFFF) as u32) {
                LRESULT(0)
            } else {
                DefWindowProcW(hwnd, msg, wparam, lparam)
            }
        }
        WM_CLOSE => {
            let _ = DestroyWindow(hwnd);
            LRESULT(0)
        }
        WM_DESTROY => {
            with_state(|s| {
                s.app.close_all_for_exit();
                if let Err(e) = s.app.settings.save() {
                    tracing::warn!(error = %e, "[Settings] failed to save settings");
                }
            });
            PostQuitMessage(0);
            LRESULT(0)
        }
        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

/// Handle a menu command.  `false` leaves it to `DefWindowProcW`.
fn on_command(hwnd: HWND, id: u32) -> bool {
    match id {
        IDM_OPEN => {
            // The dialog pumps messages; the state must not be borrowed here.
            if let Some(path) = dialogs::show_open_dialog(hwnd) {
                let outcome = with_state(|s| s.app.open(&DataOpen::file(path), &mut s.source));
                if let Some(outcome) = outcome {
                    finish_open(hwnd, outcome);
                }
            }
        }
        IDM_CLOSE => {
            with_state(|s| {
                if let Some(newest) = s.app.docs.len().checked_sub(1) {
                    s.app.close(newest);
                }
            });
            refresh_title(hwnd);
        }
        IDM_EXIT => {
            // SAFETY: hwnd is the live main window.
            let _ = unsafe { DestroyWindow(hwnd) };
        }
        IDM_ABOUT => message_box(
            hwnd,
            "Hexer 0.1.0\n\nA hexadecimal editor for Windows 10/11.",
            w!("About Hexer"),
            MB_OK,
        ),
        _ => match with_state(|s| s.app.open_recent(id, &mut s.source)).flatten() {
            Some(outcome) => finish_open(hwnd, outcome),
            None => return false,
        },
    }
    true
}

fn finish_open(hwnd: HWND, outcome: Result<usize>) {
    match outcome {
        Ok(_) => refresh_title(hwnd),
        Err(e) => message_box(hwnd, &e.to_string(), w!("Hexer"), MB_OK | MB_ICONERROR),
    }
}

fn refresh_title(hwnd: HWND) {
    if let Some(title) = with_state(|s| s.app.window_title()) {
        let title = wide(&title);
        // SAFETY: hwnd is live; `title` is null-terminated and outlives the call.
        let _ = unsafe { SetWindowTextW(hwnd, PCWSTR(title.as_ptr())) };
    }
}

/// Wrap the calling thread's last Win32 error.  Call straight after the
/// failing function, before any other API call overwrites it.
fn last_error(function: &'static str) -> HexerError {
    // SAFETY: GetLastError only reads thread-local state.
    let code = unsafe { GetLastError() };
    HexerError::Win32 {
        function,
        code: code.0,
    }
}
