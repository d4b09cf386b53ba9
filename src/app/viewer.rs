//! Full-screen photo viewer with comments

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::AbortHandle;

use crate::api::{ImageFetchClient, PhotoDetailClient};
use crate::error::FetchError;
use crate::images::{ImageCache, RequestSlot, SlotContent};
use crate::models::{Comment, PhotoDetail, PhotoId};

use super::async_ops::{
    ViewSession, ViewerResult, ViewerTarget, spawn_comments_fetch, spawn_detail_fetch,
    spawn_image_fetch,
};

/// Callbacks from the [`PhotoViewer`] to the render layer.
pub trait ViewerObserver {
    /// Details for the open photo arrived
    fn on_detail_loaded(&mut self, _detail: &PhotoDetail) {}

    /// The full-size image changed
    fn on_image_changed(&mut self) {}

    /// Comments arrived
    fn on_comments_loaded(&mut self, _count: usize) {}

    /// A comment avatar changed
    fn on_avatar_changed(&mut self, _row: usize) {}

    /// Details or comments could not be loaded
    fn on_error(&mut self, _error: &FetchError) {}
}

/// Shows one photo: its details, the full-size image and, on demand, the
/// first page of comments with their avatars.
///
/// Every [`PhotoViewer::open`] or [`PhotoViewer::close`] starts a new
/// session and abandons everything in flight for the previous one. Late
/// results from an older session are dropped, even for the same photo.
pub struct PhotoViewer<D, I> {
    session: ViewSession,
    photo_id: Option<PhotoId>,
    detail: Option<PhotoDetail>,
    comments: Option<Vec<Comment>>,
    image: RequestSlot,
    avatars: Vec<RequestSlot>,
    detail_task: Option<AbortHandle>,
    comments_task: Option<AbortHandle>,
    detail_client: Arc<D>,
    image_client: Arc<I>,
    cache: ImageCache,
    result_tx: mpsc::UnboundedSender<ViewerResult>,
    result_rx: mpsc::UnboundedReceiver<ViewerResult>,
}

impl<D: PhotoDetailClient, I: ImageFetchClient> PhotoViewer<D, I> {
    /// Create a closed viewer sharing the grid's image cache.
    pub fn new(detail_client: Arc<D>, image_client: Arc<I>, cache: ImageCache) -> Self {
        let (result_tx, result_rx) = mpsc::unbounded_channel();
        Self {
            session: ViewSession::default(),
            photo_id: None,
            detail: None,
            comments: None,
            image: RequestSlot::new(),
            avatars: Vec::new(),
            detail_task: None,
            comments_task: None,
            detail_client,
            image_client,
            cache,
            result_tx,
            result_rx,
        }
    }

    /// Id of the open photo
    pub const fn photo_id(&self) -> Option<PhotoId> {
        self.photo_id
    }

    /// Details, once loaded
    pub const fn detail(&self) -> Option<&PhotoDetail> {
        self.detail.as_ref()
    }

    /// Comments, once loaded
    pub fn comments(&self) -> Option<&[Comment]> {
        self.comments.as_deref()
    }

    /// Full-size image
    pub const fn image(&self) -> &SlotContent {
        self.image.content()
    }

    /// Avatar of the comment at `row`
    pub fn avatar(&self, row: usize) -> Option<&SlotContent> {
        self.avatars.get(row).map(RequestSlot::content)
    }

    /// Whether any fetch for the open photo is outstanding
    pub fn has_pending_work(&self) -> bool {
        self.detail_task.is_some()
            || self.comments_task.is_some()
            || self.image.pending().is_some()
            || self.avatars.iter().any(|a| a.pending().is_some())
    }

    /// Show photo `id`, abandoning whatever was open.
    pub fn open(&mut self, id: PhotoId) {
        self.close();
        tracing::debug!("Opening photo {id}");
        self.photo_id = Some(id);
        self.detail_task = Some(spawn_detail_fetch(
            Arc::clone(&self.detail_client),
            self.session,
            id,
            self.result_tx.clone(),
        ));
    }

    /// Load the first page of comments for the open photo.
    ///
    /// Returns `false` if no photo is open or comments are already loading.
    pub fn show_comments(&mut self) -> bool {
        let Some(id) = self.photo_id else {
            return false;
        };
        if self.comments_task.is_some() {
            return false;
        }
        self.comments_task = Some(spawn_comments_fetch(
            Arc::clone(&self.detail_client),
            self.session,
            id,
            self.result_tx.clone(),
        ));
        true
    }

    /// Abandon the open photo.
    pub fn close(&mut self) {
        for task in [self.detail_task.take(), self.comments_task.take()]
            .into_iter()
            .flatten()
        {
            task.abort();
        }
        self.session = self.session.next();
        self.image.clear();
        self.avatars.clear();
        self.photo_id = None;
        self.detail = None;
        self.comments = None;
    }

    /// Apply every result that has already arrived. Returns how many.
    pub fn poll<O: ViewerObserver>(&mut self, observer: &mut O) -> usize {
        let mut handled = 0;
        while let Ok(result) = self.result_rx.try_recv() {
            self.handle_result(result, observer);
            handled += 1;
        }
        handled
    }

    /// Wait for the next result and apply it.
    ///
    /// Only call this while [`has_pending_work`](Self::has_pending_work)
    /// holds; otherwise it waits forever.
    pub async fn wait<O: ViewerObserver>(&mut self, observer: &mut O) {
        if let Some(result) = self.result_rx.recv().await {
            self.handle_result(result, observer);
        }
    }

    fn bind(&mut self, target: ViewerTarget, url: &str) -> bool {
        if self.photo_id.is_none() {
            return false;
        }
        let session = self.session;
        let client = Arc::clone(&self.image_client);
        let result_tx = self.result_tx.clone();
        let slot = match target {
            ViewerTarget::Photo => &mut self.image,
            ViewerTarget::Avatar(row) => match self.avatars.get_mut(row) {
                Some(slot) => slot,
                None => return false,
            },
        };

        let owned_url = url.to_string();
        slot.assign(url, &self.cache, |request| {
            Some(spawn_image_fetch(
                client,
                owned_url,
                result_tx,
                move |url, result| ViewerResult::ImageFetched {
                    session,
                    target,
                    request,
                    url,
                    result,
                },
            ))
        });
        true
    }

    fn handle_result<O: ViewerObserver>(&mut self, result: ViewerResult, observer: &mut O) {
        match result {
            ViewerResult::DetailFetched {
                session,
                photo_id,
                result,
            } => {
                if session != self.session {
                    tracing::debug!("Dropping details for closed photo {photo_id}");
                    return;
                }
                self.detail_task = None;
                match result {
                    Ok(detail) => {
                        let url = detail.url.clone();
                        observer.on_detail_loaded(&detail);
                        self.detail = Some(detail);
                        self.bind(ViewerTarget::Photo, &url);
                        if self.image.content().image().is_some() {
                            observer.on_image_changed();
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load photo {photo_id}: {e}");
                        observer.on_error(&e);
                    }
                }
            }
            ViewerResult::CommentsFetched {
                session,
                photo_id,
                result,
            } => {
                if session != self.session {
                    tracing::debug!("Dropping comments for closed photo {photo_id}");
                    return;
                }
                self.comments_task = None;
                match result {
                    Ok(comments) => {
                        let avatar_urls: Vec<Option<String>> = comments
                            .iter()
                            .map(|c| c.avatar_url().map(str::to_owned))
                            .collect();
                        self.avatars = avatar_urls.iter().map(|_| RequestSlot::new()).collect();
                        self.comments = Some(comments);
                        observer.on_comments_loaded(avatar_urls.len());

                        for (row, url) in avatar_urls.into_iter().enumerate() {
                            if let Some(url) = url
                                && self.bind(ViewerTarget::Avatar(row), &url)
                                && self.avatars[row].content().image().is_some()
                            {
                                observer.on_avatar_changed(row);
                            }
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load comments for {photo_id}: {e}");
                        observer.on_error(&e);
                    }
                }
            }
            ViewerResult::ImageFetched {
                session,
                target,
                request,
                url,
                result,
            } => {
                let result = result.map(Arc::new);
                match &result {
                    Ok(image) => self.cache.put(&url, Arc::clone(image)),
                    Err(e) if e.is_cancelled() => tracing::debug!("Image fetch cancelled: {url}"),
                    Err(e) => tracing::warn!("Failed to load image {url}: {e}"),
                }
                if session != self.session {
                    return;
                }
                match target {
                    ViewerTarget::Photo => {
                        if self.image.complete(request, result) {
                            observer.on_image_changed();
                        }
                    }
                    ViewerTarget::Avatar(row) => {
                        if let Some(slot) = self.avatars.get_mut(row)
                            && slot.complete(request, result)
                        {
                            observer.on_avatar_changed(row);
                        }
                    }
                }
            }
        }
    }
}
